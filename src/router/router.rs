use super::matcher::MatcherResult;

pub use self::RouterError::*;

#[async_trait::async_trait]
pub trait Handler: Sync + Send {
    fn get_matcher(&self) -> &Box<dyn super::matcher::Matcher>;
    async fn handle(
        &self,
        request: hyper::Request<hyper::Body>,
    ) -> Result<hyper::Response<hyper::Body>, RouterError>;
    /// Only covers producing the response head, streamed bodies are not bounded by it
    fn get_timeout(&self) -> std::time::Duration;
}

#[derive(Debug, PartialEq)]
pub enum RouterError {
    HandlerError(u16, String),
    InvalidRequest(String),
    MethodNotAllowed,
    NotFound,
}

pub struct Router {
    handlers: Vec<Box<dyn Handler>>,
}

impl Router {
    pub fn new() -> Router {
        Router {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(mut self, handler: Box<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn add_handlers<T>(mut self, handlers: T) -> Self
    where
        T: IntoIterator<Item = Box<dyn Handler>>,
    {
        self.handlers.extend(handlers);
        self
    }

    async fn handle_inner(
        &self,
        request: hyper::Request<hyper::Body>,
    ) -> Result<hyper::Response<hyper::Body>, RouterError> {
        let handler = self.get_handler(&request)?;
        async_std::future::timeout(handler.get_timeout(), handler.handle(request))
            .await
            .map_err(|_| HandlerError(504, String::from("Handler timed out")))?
    }

    pub async fn handle(
        &self,
        request: hyper::Request<hyper::Body>,
    ) -> Result<hyper::Response<hyper::Body>, std::convert::Infallible> {
        let response = self
            .handle_inner(request)
            .await
            .unwrap_or_else(|err| Router::error(err));
        log::debug!("Answering with status {}", response.status());
        Ok(response)
    }

    fn get_handler(
        &self,
        request: &hyper::Request<hyper::Body>,
    ) -> Result<&Box<dyn Handler>, RouterError> {
        log::info!("{:?} {:?}", request.method(), request.uri());
        log::trace!("Headers: {:?}", request.headers());
        let mut router_error = NotFound;
        for handler in self.handlers.iter() {
            match handler.get_matcher().matches(request) {
                MatcherResult::OK => return Ok(handler),
                MatcherResult::UriOnly => router_error = MethodNotAllowed,
                MatcherResult::KO => (),
            }
        }
        Err(router_error)
    }

    fn error(error: RouterError) -> hyper::Response<hyper::Body> {
        log::info!("Sending error response {:?}", &error);
        let (status, message) = match error {
            HandlerError(status, msg) => (status, msg),
            InvalidRequest(msg) => (400, msg),
            MethodNotAllowed => (405, String::from("Method Not Allowed")),
            NotFound => (404, String::from("Not Found")),
        };
        let mut response = hyper::Response::new(hyper::Body::from(message));
        *response.status_mut() = hyper::StatusCode::from_u16(status)
            .unwrap_or(hyper::StatusCode::INTERNAL_SERVER_ERROR);
        response.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("text/plain"),
        );
        response
    }
}
