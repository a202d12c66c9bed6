/// Home page, either the static index or a summary of the available directories
struct IndexHandler {
    matcher: Box<dyn crate::router::matcher::Matcher>,
    registry: std::sync::Arc<crate::dispenser::DirectoryRegistry>,
    static_repo: std::sync::Arc<crate::files::StaticFileRepository>,
}

impl IndexHandler {
    fn get_summary(&self) -> String {
        let mut summary = format!(
            "{}: {}\nTo add a new directory, add a new folder to the data directory. Then restart the application.\nAvailable Directories:\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        );
        for dispenser in self.registry.iter() {
            let count = match dispenser.count() {
                Ok(count) => count.to_string(),
                Err(e) => {
                    log::warn!("Could not count files of '{}': {:?}", dispenser.get_name(), e);
                    String::from("?")
                }
            };
            summary.push_str(&format!(
                "- {} ({} files{})\n",
                dispenser.get_name(),
                count,
                if dispenser.deletes_by_default() {
                    ""
                } else {
                    ", never deleted"
                }
            ));
        }
        summary
    }
}

#[async_trait::async_trait]
impl crate::router::Handler for IndexHandler {
    fn get_matcher(&self) -> &Box<dyn crate::router::matcher::Matcher> {
        &self.matcher
    }

    async fn handle(
        &self,
        request: hyper::Request<hyper::Body>,
    ) -> Result<hyper::Response<hyper::Body>, crate::router::RouterError> {
        if self.static_repo.has_index() {
            let index = self.static_repo.open(request.uri().path()).await?;
            return hyper::Response::builder()
                .status(200)
                .header(http::header::CONTENT_TYPE, index.mime_type)
                .header(http::header::CONTENT_LENGTH, index.length)
                .body(super::get_stream_body(index.file))
                .map_err(|e| crate::router::map_error(&e, "Invalid response", 500));
        }

        hyper::Response::builder()
            .status(200)
            .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(hyper::Body::from(self.get_summary()))
            .map_err(|e| crate::router::map_error(&e, "Invalid response", 500))
    }

    fn get_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(5)
    }
}

pub fn get_handler(
    registry: std::sync::Arc<crate::dispenser::DirectoryRegistry>,
    static_repo: std::sync::Arc<crate::files::StaticFileRepository>,
) -> Box<dyn crate::router::Handler> {
    let matcher = crate::router::matcher::builder()
        .exact_path("/")
        .with_method(&hyper::Method::GET)
        .build()
        .expect("Invalid matcher for the index");
    Box::from(IndexHandler {
        matcher,
        registry,
        static_repo,
    })
}
