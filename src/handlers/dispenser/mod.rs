mod handlers;

fn get_matcher(name: &str) -> Result<Box<dyn crate::router::matcher::Matcher>, String> {
    crate::router::matcher::builder()
        .exact_path(format!("/{}", name))
        .with_method(&hyper::Method::GET)
        .build()
        .map_err(|e| format!("{:?}", e))
}

/// One `GET /<name>` route per dispenser of the registry
pub fn get_dispenser_handlers(
    registry: &crate::dispenser::DirectoryRegistry,
) -> Vec<Box<dyn crate::router::Handler>> {
    let mut dispenser_handlers: Vec<Box<dyn crate::router::Handler>> = Vec::new();
    for dispenser in registry.iter() {
        match get_matcher(dispenser.get_name()) {
            Ok(matcher) => {
                log::info!("Serving '{}' on /{}", dispenser.get_name(), dispenser.get_name());
                dispenser_handlers.push(Box::from(handlers::DispenseHandler {
                    dispenser: dispenser.clone(),
                    matcher,
                }));
            }
            Err(e) => log::warn!("No route for '{}': {}", dispenser.get_name(), e),
        }
    }
    dispenser_handlers
}
