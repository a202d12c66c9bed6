static TOTAL_FILES_HEADER: &str = "total-files";

/// Handler that answers each GET with a random file of its directory
pub struct DispenseHandler {
    pub dispenser: std::sync::Arc<crate::dispenser::FileDispenser>,
    pub matcher: Box<dyn crate::router::matcher::Matcher>,
}

#[derive(Debug, serde::Deserialize)]
struct DispenseQuery {
    delete: Option<String>,
}

fn get_delete_override(uri: &http::Uri) -> Result<Option<bool>, crate::router::RouterError> {
    let query: DispenseQuery = serde_urlencoded::from_str(uri.query().unwrap_or(""))
        .map_err(|e| crate::router::map_error(&e, "Invalid query", 400))?;
    match query.delete.as_deref() {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(value) if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(value) => Err(crate::router::InvalidRequest(format!(
            "Invalid value for delete: '{}'",
            value
        ))),
    }
}

#[async_trait::async_trait]
impl crate::router::Handler for DispenseHandler {
    fn get_matcher(&self) -> &Box<dyn crate::router::matcher::Matcher> {
        &self.matcher
    }

    async fn handle(
        &self,
        request: hyper::Request<hyper::Body>,
    ) -> Result<hyper::Response<hyper::Body>, crate::router::RouterError> {
        let delete = get_delete_override(request.uri())?;

        let dispensed = self
            .dispenser
            .dispense(delete)
            .await
            .map_err(|e| {
                log::warn!("Could not dispense from {:?}", e.get_path());
                crate::router::map_error(&e, "Could not dispense a file", 500)
            })?;

        let dispensed = match dispensed {
            Some(dispensed) => dispensed,
            None => {
                return hyper::Response::builder()
                    .status(200)
                    .body(hyper::Body::empty())
                    .map_err(|e| crate::router::map_error(&e, "Invalid response", 500));
            }
        };

        if dispensed.is_fallback {
            log::debug!(
                "'{}' is empty, serving {:?}",
                self.dispenser.get_name(),
                dispensed.stream.get_path()
            );
        }

        let mut response = hyper::Response::builder()
            .status(200)
            .header(http::header::CONTENT_TYPE, dispensed.mime_type)
            .header(TOTAL_FILES_HEADER, dispensed.total_files);

        match dispensed.stream.get_length().await {
            Ok(length) => response = response.header(http::header::CONTENT_LENGTH, length),
            Err(e) => log::warn!("Could not get the size of the file: {:?}", e),
        }

        response
            .body(super::super::get_stream_body(dispensed.stream))
            .map_err(|e| crate::router::map_error(&e, "Invalid response", 500))
    }

    fn get_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(10)
    }
}
