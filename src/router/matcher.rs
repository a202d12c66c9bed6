/// Result of a check made by a [Matcher]
/// [MatcherResult::OK] means the the request can be handled
/// [MatcherResult::UriOnly] means the request should have be handled, but the method is incorrect
/// [MatcherResult::KO] means the request cannot be handled
#[derive(Debug, PartialEq)]
pub enum MatcherResult {
    OK,
    UriOnly,
    KO,
}

/// Trait to implement to be able to tell whether a [crate::router::Handler] can handle a query or not
pub trait Matcher: Sync + Send {
    fn matches(&self, request: &hyper::Request<hyper::Body>) -> MatcherResult;
}

#[derive(Debug)]
pub enum MatcherBuilderError {
    IncorrectUri,
    IncorrectMethod,
}

enum UriMatcher {
    All,
    Exact(String),
    Regex(regex::Regex),
}

enum MethodMatcher {
    All,
    Exact(hyper::Method),
}

struct MatcherImpl {
    method_matcher: MethodMatcher,
    uri_matcher: UriMatcher,
}

impl Matcher for MatcherImpl {
    fn matches(&self, request: &hyper::Request<hyper::Body>) -> MatcherResult {
        let path = request.uri().path();
        let uri_match = match &self.uri_matcher {
            UriMatcher::All => true,
            UriMatcher::Exact(uri) => path == uri,
            UriMatcher::Regex(re) => re.is_match(path),
        };

        if !uri_match {
            return MatcherResult::KO;
        }

        let method_match = match &self.method_matcher {
            MethodMatcher::All => true,
            MethodMatcher::Exact(method) => request.method() == method,
        };

        if method_match {
            MatcherResult::OK
        } else {
            MatcherResult::UriOnly
        }
    }
}

pub struct MatcherBuilder {
    method_matcher: Option<MethodMatcher>,
    uri_matcher: Option<UriMatcher>,
}

pub fn builder() -> MatcherBuilder {
    MatcherBuilder::new()
}

impl MatcherBuilder {
    fn new() -> MatcherBuilder {
        MatcherBuilder {
            method_matcher: Some(MethodMatcher::All),
            uri_matcher: Some(UriMatcher::All),
        }
    }

    pub fn exact_path<T>(mut self, uri: T) -> MatcherBuilder
    where
        T: std::convert::Into<String>,
    {
        let uri: String = uri.into();
        self.uri_matcher = if uri.starts_with('/') {
            Some(UriMatcher::Exact(uri))
        } else {
            None
        };
        self
    }

    pub fn regex_path(mut self, regex: &str) -> MatcherBuilder {
        self.uri_matcher = regex::Regex::new(regex).ok().map(UriMatcher::Regex);
        self
    }

    pub fn with_method<T>(mut self, method: T) -> MatcherBuilder
    where
        hyper::Method: std::convert::TryFrom<T>,
    {
        let method: std::result::Result<hyper::Method, _> = std::convert::TryFrom::try_from(method);
        self.method_matcher = method.ok().map(MethodMatcher::Exact);
        self
    }

    pub fn build(self) -> Result<Box<dyn Matcher>, MatcherBuilderError> {
        let method_matcher = self
            .method_matcher
            .ok_or(MatcherBuilderError::IncorrectMethod)?;
        let uri_matcher = self.uri_matcher.ok_or(MatcherBuilderError::IncorrectUri)?;
        Ok(Box::new(MatcherImpl {
            method_matcher,
            uri_matcher,
        }))
    }
}
