use std::fmt;

use serde::{Deserialize, Serialize};

use super::Handler;
use crate::{Method, middleware::MiddlewareHandler};

/// A fully resolved route: what the builder exports for the HTTP layer to register.
///
/// Records are immutable once exported and cheap to clone; handlers and middleware are
/// reference counted.
#[derive(Clone)]
pub struct RouteRecord {
    method: Method,
    path: String,
    middleware: Vec<MiddlewareHandler>,
    handler: Handler,
}

impl RouteRecord {
    pub(crate) fn new(
        method: Method,
        path: String,
        middleware: Vec<MiddlewareHandler>,
        handler: Handler,
    ) -> Self {
        Self {
            method,
            path,
            middleware,
            handler,
        }
    }

    /// HTTP method the route answers to.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Fully joined route path, including every enclosing prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Middleware to run before the handler, outermost first. Empty means none.
    pub fn middleware(&self) -> &[MiddlewareHandler] {
        &self.middleware
    }

    /// Returns `true` if any middleware is attached.
    pub fn has_middleware(&self) -> bool {
        !self.middleware.is_empty()
    }

    /// The endpoint handler.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Splits the record into its parts.
    pub fn into_parts(self) -> (Method, String, Vec<MiddlewareHandler>, Handler) {
        (self.method, self.path, self.middleware, self.handler)
    }

    /// Serializable listing entry for this record.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            method: self.method,
            path: self.path.clone(),
            middleware: self.middleware.len(),
        }
    }
}

impl fmt::Debug for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Serializable listing entry for a [`RouteRecord`].
///
/// ```
/// use routedef::router::RouteSummary;
/// use routedef::Method;
///
/// let summary = RouteSummary { method: Method::Get, path: "/users".into(), middleware: 0 };
/// assert_eq!(
///     serde_json::to_string(&summary).unwrap(),
///     r#"{"method":"GET","path":"/users","middleware":0}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub method: Method,
    pub path: String,
    /// Number of middleware attached.
    pub middleware: usize,
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6} {}", self.method.as_str(), self.path)?;
        if self.middleware > 0 {
            write!(f, " [{} middleware]", self.middleware)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::middleware;
    use crate::router::handler;
    use crate::{Response, StatusCode};

    fn record(middleware_count: usize) -> RouteRecord {
        let mw = middleware(|ctx, next| async move { next.run(ctx).await });
        RouteRecord::new(
            Method::Put,
            "/users/:id".into(),
            vec![mw; middleware_count],
            handler(|_ctx| async { Response::new(StatusCode::Ok) }),
        )
    }

    #[test]
    fn summary_reflects_record() {
        let summary = record(2).summary();
        assert_eq!(
            summary,
            RouteSummary {
                method: Method::Put,
                path: "/users/:id".into(),
                middleware: 2,
            }
        );
        assert_eq!(summary.to_string(), "PUT    /users/:id [2 middleware]");
    }

    #[test]
    fn no_middleware_is_empty() {
        let r = record(0);
        assert!(!r.has_middleware());
        assert!(r.middleware().is_empty());
        assert_eq!(r.summary().to_string(), "PUT    /users/:id");
    }

    #[test]
    fn debug_hides_callables() {
        let debug = format!("{:?}", record(1));
        assert!(debug.contains("RouteRecord"));
        assert!(debug.contains("/users/:id"));
    }
}
