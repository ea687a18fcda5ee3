//! Route definitions: declare routes, groups, and resources, then export a flat table.
//!
//! [`RouteBuilder`] accepts overloaded argument lists in the style of a dynamic routing
//! DSL. Every call takes a path and a tail of [`Arg`]s that is matched against a small
//! set of documented shapes:
//!
//! | Call                   | Accepted tails                                                    |
//! |------------------------|-------------------------------------------------------------------|
//! | `get`/`post`/`put`/... | `(handler)`, `(middleware, handler)`                              |
//! | `group`                | `(scope)`, `(middleware, scope)`                                  |
//! | `resource`             | `[middleware,] controller [, options] [, scope]`                  |
//!
//! Groups and nested resources prefix their path onto every route declared inside them
//! and prepend their middleware, outer groups first. Resources expand into up to seven
//! routes, one per [`Action`].
//!
//! ```rust
//! use routedef::router::{handler, scope, RouteBuilder};
//! use routedef::middleware::middleware;
//! use routedef::{Method, Response, StatusCode};
//!
//! # fn main() -> Result<(), routedef::router::InvalidRouteArguments> {
//! let ok = handler(|_ctx| async { Response::new(StatusCode::Ok) });
//! let auth = middleware(|ctx, next| async move { next.run(ctx).await });
//!
//! let mut routes = RouteBuilder::new();
//! routes.get("/health", ok.clone())?;
//! routes.group("/api", (auth, scope(move |api| {
//!     api.post("/users", ok.clone())?;
//!     Ok(())
//! })))?;
//!
//! let table = routes.export();
//! assert_eq!(table.len(), 2);
//! assert_eq!(table[1].path(), "/api/users");
//! assert_eq!(table[1].method(), Method::Post);
//! assert_eq!(table[1].middleware().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::{future::Future, sync::Arc};

use crate::{Response, context::Context, middleware::BoxFuture};

pub mod args;
mod builder;
mod error;
pub mod is;
pub mod path;
mod record;
pub mod resource;

pub use args::{Arg, Args, Scope, scope};
pub use builder::RouteBuilder;
pub use error::{InvalidRouteArguments, Result};
pub use record::{RouteRecord, RouteSummary};
pub use resource::{Action, ActionMap, Controller, ResourceOptions, controller};

/// Type-erased, heap-allocated async handler that processes a [`Context`] and returns a
/// [`Response`].
///
/// Handlers are stored behind `Arc<dyn Fn(…)>` so they can be cloned into every route
/// that uses them and shared across threads without copying the underlying closure.
/// Build one with [`handler`].
pub type Handler = Arc<dyn Fn(Context) -> BoxFuture + Send + Sync + 'static>;

/// Wraps an async function or closure as a [`Handler`].
///
/// # Examples
///
/// ```rust
/// use routedef::router::handler;
/// use routedef::{Response, StatusCode};
///
/// let show = handler(|ctx| async move {
///     let id = ctx.params().get("id").unwrap_or("unknown").to_owned();
///     Response::new(StatusCode::Ok).body(id)
/// });
/// ```
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |ctx: Context| -> BoxFuture { Box::pin(f(ctx)) })
}
