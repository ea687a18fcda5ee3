//! Route table: register exported route records and dispatch requests through them.
//!
//! [`RouteTable`] is the consuming side of [`RouteBuilder::export`](crate::router::RouteBuilder::export):
//! each [`RouteRecord`] is registered under its method and path, and a matching request
//! runs the record's middleware in order before its handler. Three pattern styles are
//! supported:
//!
//! | Pattern              | Example match              | Captured params                 |
//! |----------------------|----------------------------|---------------------------------|
//! | `/users`             | `/users`                   | *(none)*                        |
//! | `/users/:id`         | `/users/42`                | `id → "42"`                     |
//! | `/files/*`           | `/files/docs/readme.txt`   | `wildcard → "/docs/readme.txt"` |
//!
//! Incoming paths are normalized before matching the same way route paths are, so
//! `/users/` and `//users` both match `/users`.
//! Routes are matched in registration order; the first route whose method and pattern
//! both match the incoming request wins.

use std::sync::Arc;

use crate::context::{Context, PathParams};
use crate::middleware::{MiddlewareHandler, Next};
use crate::router::{Handler, RouteRecord, path};
use crate::{Method, Request, Response, StatusCode};

// A single path segment, either a literal string or a named capture (`:name`).
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Static(String),
    Parameter(String),
}

// Compiled representation of a route path.
#[derive(Debug, Clone, PartialEq)]
enum Pattern {
    // Matches one exact path string, e.g. `/users`.
    Exact(String),
    // Matches a fixed number of segments where some are named captures, e.g. `/users/:id`.
    Parameterized(Vec<Segment>),
    // Matches any path that starts with the given prefix, e.g. `/files/*`.
    Wildcard(String),
}

impl Pattern {
    // Classified in order: trailing `/*` → wildcard, any `:` → parameterized, else exact.
    fn parse(pattern: &str) -> Self {
        let pattern = path::normalize(pattern);

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return Pattern::Wildcard(prefix.to_owned());
        }

        if pattern.contains(':') {
            let segments = segments(&pattern)
                .map(|s| match s.strip_prefix(':') {
                    Some(name) => Segment::Parameter(name.to_owned()),
                    None => Segment::Static(s.to_owned()),
                })
                .collect();
            return Pattern::Parameterized(segments);
        }

        Pattern::Exact(pattern)
    }

    // Try to match a normalized `path`, returning extracted [`PathParams`] on success.
    fn matches(&self, path: &str) -> Option<PathParams> {
        match self {
            Pattern::Exact(p) => (p == path).then(PathParams::new),
            Pattern::Parameterized(pattern) => {
                let mut params = PathParams::new();
                let mut incoming = segments(path);

                for segment in pattern {
                    let value = incoming.next()?;
                    match segment {
                        Segment::Static(s) if s != value => return None,
                        Segment::Static(_) => {}
                        Segment::Parameter(name) => params.insert(name.as_str(), value),
                    }
                }

                incoming.next().is_none().then_some(params)
            }
            Pattern::Wildcard(prefix) => {
                let suffix = path.strip_prefix(prefix.as_str())?;
                if !suffix.is_empty() && !suffix.starts_with('/') {
                    return None;
                }
                let mut params = PathParams::new();
                params.insert("wildcard", suffix);
                Some(params)
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

// A registered route: the compiled pattern plus what to run when it matches.
struct Entry {
    method: Method,
    pattern: Pattern,
    middleware: Arc<[MiddlewareHandler]>,
    handler: Handler,
}

/// Dispatches requests to exported route records.
///
/// When no route matches, `404 Not Found` is returned.
///
/// # Examples
///
/// ```rust,no_run
/// use routedef::dispatch::RouteTable;
/// use routedef::router::{handler, RouteBuilder};
/// use routedef::{Method, Request, Response, StatusCode};
///
/// # async fn example() -> Result<(), routedef::router::InvalidRouteArguments> {
/// let mut routes = RouteBuilder::new();
/// routes.get("/users/:id", handler(|ctx| async move {
///     let id = ctx.params().get("id").unwrap_or("unknown").to_owned();
///     Response::new(StatusCode::Ok).body(id)
/// }))?;
///
/// let table = RouteTable::from_records(routes.export());
/// let response = table.dispatch(Request::new(Method::Get, "/users/42")).await;
/// assert_eq!(response.text(), "42");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<Entry>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from exported records, preserving their order.
    ///
    /// # Arguments
    ///
    /// - `records`: routes as returned by [`RouteBuilder::export`](crate::router::RouteBuilder::export)
    ///   or [`RouteBuilder::into_routes`](crate::router::RouteBuilder::into_routes).
    pub fn from_records(records: impl IntoIterator<Item = RouteRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.register(record);
        }
        table
    }

    /// Register one record under its method and path.
    ///
    /// The record's path is compiled into a pattern here; records registered earlier
    /// take precedence when several patterns match.
    ///
    /// # Arguments
    ///
    /// - `record`: the route to register; its middleware and handler are kept as-is.
    pub fn register(&mut self, record: RouteRecord) {
        let (method, path, middleware, handler) = record.into_parts();
        tracing::debug!(%method, %path, middleware = middleware.len(), "route registered");
        self.entries.push(Entry {
            method,
            pattern: Pattern::parse(&path),
            middleware: middleware.into(),
            handler,
        });
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no routes have been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dispatch `request` to the first matching route and return its response.
    ///
    /// # Arguments
    ///
    /// - `request`: the incoming request; its path is normalized before matching.
    ///
    /// # Returns
    ///
    /// The [`Response`] from the matched route's middleware chain, or
    /// `404 Not Found` if no route matches both method and path.
    pub async fn dispatch(&self, request: Request) -> Response {
        let path = path::normalize(request.path());
        let matched = self.entries.iter().find_map(|entry| {
            (entry.method == request.method())
                .then(|| entry.pattern.matches(&path))
                .flatten()
                .map(|params| (entry, params))
        });

        match matched {
            Some((entry, params)) => {
                let ctx = Context::with_params(request, params);
                Next::new(Arc::clone(&entry.middleware), Arc::clone(&entry.handler))
                    .run(ctx)
                    .await
            }
            None => {
                tracing::debug!(method = %request.method(), path = request.path(), "no route matched");
                Response::new(StatusCode::NotFound)
            }
        }
    }
}
