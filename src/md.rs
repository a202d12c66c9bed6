use std::str::FromStr;

use futures::FutureExt;

pub mod configuration;
pub mod dispenser;
mod files;
mod handlers;
mod router;

#[derive(Debug)]
pub enum ServeError {
    InvalidHost(String),
    Registry(dispenser::DispenserError),
    Server(hyper::Error),
}

async fn shutdown_signal(exit_channel: Option<futures::channel::oneshot::Receiver<()>>) {
    let mut exit_channel = Box::pin(async move {
        match exit_channel {
            Some(receiver) => receiver.await,
            None => futures::future::pending().await,
        }
    })
    .fuse();

    let mut ctrl_c = Box::pin(tokio::signal::ctrl_c()).fuse();

    let mut term = Box::pin(async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => term.recv().await,
            Err(e) => {
                log::warn!("Could not intercept TERM signal: {:?}", e);
                futures::future::pending().await
            }
        }
    })
    .fuse();

    futures::select! {
        c = ctrl_c => log::info!("Received Ctrl+C, exiting: {:?}", c),
        r = exit_channel => log::info!("Received exit signal: {:?}", r),
        t = term => log::info!("Received terminate signal: {:?}", t),
    }
}

fn get_socketaddr(
    configuration: &configuration::ServerConfiguration,
) -> Result<std::net::SocketAddr, ServeError> {
    let ip = std::net::IpAddr::from_str(configuration.host.as_str())
        .map_err(|_| ServeError::InvalidHost(configuration.host.to_owned()))?;
    Ok(std::net::SocketAddr::new(ip, configuration.port))
}

fn setup_router(
    configuration: &configuration::DispenserServiceConfiguration,
) -> Result<std::sync::Arc<router::Router>, ServeError> {
    let registry = dispenser::DirectoryRegistry::build(
        &configuration.dispenser.data_path,
        configuration.dispenser.debug_mode,
    )
    .map_err(ServeError::Registry)?;
    log::info!(
        "Found {} directories in {:?}",
        registry.len(),
        registry.get_data_root()
    );
    if configuration.dispenser.debug_mode {
        log::warn!("Debug mode, files will never be deleted");
    }
    let registry = std::sync::Arc::new(registry);

    let static_repo = files::StaticFileRepository::new(&configuration.static_files.root_path);

    // the static handler matches everything and has to stay last
    let router = router::Router::new()
        .add_handler(handlers::index::get_handler(
            registry.clone(),
            static_repo.clone(),
        ))
        .add_handlers(handlers::dispenser::get_dispenser_handlers(&registry))
        .add_handler(handlers::statics::get_handler(static_repo));

    Ok(std::sync::Arc::new(router))
}

/// Starts the server and runs until Ctrl+C, SIGTERM, or a message on `exit_channel`
pub async fn serve(
    configuration: &configuration::DispenserServiceConfiguration,
    exit_channel: Option<futures::channel::oneshot::Receiver<()>>,
) -> Result<(), ServeError> {
    let addr = get_socketaddr(&configuration.server)?;

    let router = setup_router(configuration)?;

    let make_svc =
        hyper::service::make_service_fn(move |connection: &hyper::server::conn::AddrStream| {
            log::debug!("Got connection from {:?}", connection.remote_addr());

            let router = router.clone();
            async move {
                Ok::<_, std::convert::Infallible>(hyper::service::service_fn(move |req| {
                    let router = router.clone();
                    async move { router.handle(req).await }
                }))
            }
        });

    let server = hyper::Server::try_bind(&addr)
        .map_err(ServeError::Server)?
        .serve(make_svc);

    let graceful = server.with_graceful_shutdown(shutdown_signal(exit_channel));

    log::info!("Server now listening on {}", addr);

    graceful.await.map_err(ServeError::Server)?;

    log::info!("Exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    #[rstest::rstest]
    #[case("0.0.0.0", 8080, "0.0.0.0:8080")]
    #[case("::1", 9000, "[::1]:9000")]
    fn it_builds_the_address(#[case] host: &str, #[case] port: u16, #[case] expected: &str) {
        let configuration = crate::configuration::ServerConfiguration {
            host: String::from(host),
            port,
        };

        let addr = super::get_socketaddr(&configuration).unwrap();

        assert_eq!(expected, addr.to_string());
    }

    #[test]
    fn it_refuses_invalid_hosts() {
        let configuration = crate::configuration::ServerConfiguration {
            host: String::from("localhost:80"),
            port: 8080,
        };

        assert!(matches!(
            super::get_socketaddr(&configuration),
            Err(super::ServeError::InvalidHost(_))
        ));
    }
}
