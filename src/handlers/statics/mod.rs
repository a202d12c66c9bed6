/// Serves the files of the static root for any GET no other handler took
struct StaticFileHandler {
    matcher: Box<dyn crate::router::matcher::Matcher>,
    static_repo: std::sync::Arc<crate::files::StaticFileRepository>,
}

#[async_trait::async_trait]
impl crate::router::Handler for StaticFileHandler {
    fn get_matcher(&self) -> &Box<dyn crate::router::matcher::Matcher> {
        &self.matcher
    }

    async fn handle(
        &self,
        request: hyper::Request<hyper::Body>,
    ) -> Result<hyper::Response<hyper::Body>, crate::router::RouterError> {
        let static_file = self.static_repo.open(request.uri().path()).await?;

        hyper::Response::builder()
            .status(200)
            .header(http::header::CONTENT_TYPE, static_file.mime_type)
            .header(http::header::CONTENT_LENGTH, static_file.length)
            .body(super::get_stream_body(static_file.file))
            .map_err(|e| crate::router::map_error(&e, "Invalid response", 500))
    }

    fn get_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(5)
    }
}

/// Must be registered last, it matches every path
pub fn get_handler(
    static_repo: std::sync::Arc<crate::files::StaticFileRepository>,
) -> Box<dyn crate::router::Handler> {
    let matcher = crate::router::matcher::builder()
        .regex_path("^/")
        .with_method(&hyper::Method::GET)
        .build()
        .expect("Invalid matcher for static files");
    Box::from(StaticFileHandler {
        matcher,
        static_repo,
    })
}

#[cfg(test)]
mod tests {
    use crate::dispenser::tests::TestDirectory;

    fn get_request(uri: &str) -> hyper::Request<hyper::Body> {
        hyper::Request::builder()
            .uri(uri)
            .method("GET")
            .body(hyper::Body::empty())
            .unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn it_serves_static_files() {
        let test_dir = TestDirectory::new("statics_serve");
        test_dir.add_file("wwwroot/overlay.js", "let a = 1;");
        let handler =
            super::get_handler(crate::files::StaticFileRepository::new(test_dir.get_path("wwwroot")));

        let (parts, body) = handler
            .handle(get_request("/overlay.js"))
            .await
            .unwrap()
            .into_parts();

        assert_eq!(200, parts.status);
        assert_eq!("application/javascript", parts.headers["content-type"]);
        assert_eq!("10", parts.headers["content-length"]);
        assert_eq!("let a = 1;", hyper::body::to_bytes(body).await.unwrap());
    }

    #[test_log::test(tokio::test)]
    async fn it_answers_404_for_missing_files() {
        let test_dir = TestDirectory::new("statics_missing");
        let handler =
            super::get_handler(crate::files::StaticFileRepository::new(test_dir.get_path("wwwroot")));

        let error = handler.handle(get_request("/nothing.css")).await.unwrap_err();

        assert_eq!(crate::router::NotFound, error);
    }
}
