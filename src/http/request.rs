//! In-process HTTP request value.

use bytes::Bytes;

use super::{Headers, Method};

/// A request handed to [`RouteTable::dispatch`](crate::dispatch::RouteTable::dispatch).
///
/// The request target is split into path and query on construction; the path is what
/// route patterns are matched against.
///
/// # Examples
///
/// ```
/// use routedef::http::{Method, Request};
///
/// let request = Request::new(Method::Get, "/users/42?expand=posts")
///     .header("Host", "localhost");
/// assert_eq!(request.path(), "/users/42");
/// assert_eq!(request.query(), Some("expand=posts"));
/// assert_eq!(request.headers().get("host"), Some("localhost"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Headers,
    body: Bytes,
}

impl Request {
    /// Creates a request for `target`, which may carry a `?query` suffix.
    pub fn new(method: Method, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };

        Self {
            method,
            path: path.to_owned(),
            query,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the request path (without the query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`), if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the request body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
