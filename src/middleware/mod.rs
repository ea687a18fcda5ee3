//! Middleware pipeline: composable before/after request handler logic.
//!
//! Route definitions attach middleware to routes and groups; the dispatch table runs
//! a route's middleware in the recorded order and finishes with the route's handler.
//!
//! ## Core types
//!
//! - [`Middleware`]: trait implemented by struct-style middleware.
//! - [`Next`]: cursor into the remaining middleware chain; call [`Next::run`] to
//!   advance to the next layer.
//! - [`MiddlewareHandler`]: type-erased, cheaply-cloneable middleware function.
//! - [`middleware`] / [`from_middleware`]: build a [`MiddlewareHandler`] from a
//!   closure or from a [`Middleware`] implementation.
//! - [`LoggerMiddleware`]: built-in request/response logger.

use std::{future::Future, pin::Pin, sync::Arc};
use tokio::time::Instant;

use crate::{Response, context::Context, router::Handler};

/// Boxed future returned by handlers and middleware.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A cursor into the remaining middleware chain for a single request.
///
/// `Next` is passed to each middleware. Calling [`Next::run`] advances the cursor by one
/// position and invokes the next middleware, or the route handler once the chain is
/// exhausted.
///
/// `Next` is consumed on each call to [`run`](Self::run), so it cannot be called
/// more than once per middleware invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use routedef::middleware::{middleware, MiddlewareHandler};
///
/// let pass_through: MiddlewareHandler = middleware(|ctx, next| async move {
///     next.run(ctx).await
/// });
/// ```
pub struct Next {
    middlewares: Arc<[MiddlewareHandler]>,
    // Tracks which middleware to invoke on the next `run` call.
    index: usize,
    endpoint: Handler,
}

/// A type-erased, reference-counted middleware function.
///
/// Every middleware attached to a route is stored as a `MiddlewareHandler`.
/// The [`Arc`] wrapper makes handlers cheap to clone, so a group's middleware can be
/// shared by every route declared inside it.
pub type MiddlewareHandler = Arc<dyn Fn(Context, Next) -> BoxFuture + Send + Sync + 'static>;

/// Wraps an async closure as a [`MiddlewareHandler`].
///
/// # Arguments
///
/// - `f`: async function receiving the request [`Context`] and the [`Next`] cursor.
///
/// # Returns
///
/// A [`MiddlewareHandler`] that can be attached to routes, groups, and resources.
///
/// # Examples
///
/// ```rust,no_run
/// use routedef::{Response, StatusCode};
/// use routedef::middleware::middleware;
///
/// let require_key = middleware(|ctx, next| async move {
///     if !ctx.request().headers().contains("x-api-key") {
///         return Response::new(StatusCode::Unauthorized);
///     }
///     next.run(ctx).await
/// });
/// ```
pub fn middleware<F, Fut>(f: F) -> MiddlewareHandler
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |ctx: Context, next: Next| -> BoxFuture { Box::pin(f(ctx, next)) })
}

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
///
/// # Arguments
///
/// - `middleware`: a reference-counted [`Middleware`] to wrap.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use routedef::middleware::{LoggerMiddleware, from_middleware};
///
/// let handler = from_middleware(Arc::new(LoggerMiddleware));
/// ```
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: Context, next: Next| middleware.handle(ctx, next))
}

impl Next {
    /// Creates a new `Next` positioned at the start of `middlewares`, ending in `endpoint`.
    ///
    /// # Arguments
    ///
    /// - `middlewares`: the ordered middleware of one route, outermost first.
    /// - `endpoint`: the route handler invoked once every middleware has been entered.
    pub fn new(middlewares: impl Into<Arc<[MiddlewareHandler]>>, endpoint: Handler) -> Self {
        Self {
            middlewares: middlewares.into(),
            index: 0,
            endpoint,
        }
    }

    /// Invokes the next middleware in the chain and returns its response.
    ///
    /// Once every middleware has been entered, the route handler is called instead.
    ///
    /// # Arguments
    ///
    /// - `ctx`: the per-request [`Context`] to pass to the next middleware.
    ///
    /// # Returns
    ///
    /// The [`Response`] produced by the next middleware or handler in the chain.
    pub async fn run(mut self, ctx: Context) -> Response {
        match self.middlewares.get(self.index).cloned() {
            Some(handler) => {
                self.index += 1;
                handler(ctx, self).await
            }
            None => (self.endpoint)(ctx).await,
        }
    }
}

/// The core trait for struct-style middleware.
///
/// Implementors receive a [`Context`] and a [`Next`] cursor. They may:
///
/// - **Pass through**: call `next.run(ctx).await` without modification.
/// - **Short-circuit**: return a [`Response`] directly without calling `next`.
/// - **Decorate**: call `next.run(ctx).await`, inspect the response, and return
///   a modified copy.
///
/// Implementations must be `Send + Sync` because exported routes are shared across
/// request tasks.
pub trait Middleware: Send + Sync {
    /// Handle the request and optionally delegate to the next middleware.
    ///
    /// # Arguments
    ///
    /// - `ctx`: the per-request [`Context`] carrying the request and its path parameters.
    /// - `next`: cursor into the remainder of the middleware chain; call [`Next::run`]
    ///   to forward the request.
    ///
    /// # Returns
    ///
    /// A [`Response`], either produced here (short-circuit) or forwarded from downstream.
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture;
}

/// Built-in middleware that logs each request's method, path, status, and duration.
///
/// Emits a single `tracing::info!` line after the downstream handler completes,
/// in the format:
///
/// ```text
/// METHOD /path - STATUS (duration)
/// ```
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    /// Logs the request once the downstream handler has responded.
    ///
    /// # Returns
    ///
    /// The unmodified [`Response`] returned by the downstream handler.
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
        Box::pin(async move {
            let start = Instant::now();
            let method = ctx.request().method();
            let path = ctx.request().path().to_string();

            let response = next.run(ctx).await;

            let duration = start.elapsed();
            let status = response.status().as_u16();

            tracing::info!("{} {} - {} ({:?})", method, path, status, duration);

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::router::handler;
    use crate::{Method, Request, StatusCode};

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> MiddlewareHandler {
        let log = Arc::clone(log);
        middleware(move |ctx, next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(name);
                next.run(ctx).await
            }
        })
    }

    fn ctx(path: &str) -> Context {
        Context::new(Request::new(Method::Get, path))
    }

    #[tokio::test]
    async fn empty_chain_calls_endpoint() {
        let endpoint = handler(|_ctx| async { Response::new(StatusCode::Accepted) });
        let res = Next::new(Vec::new(), endpoint).run(ctx("/")).await;
        assert_eq!(res.status(), StatusCode::Accepted);
    }

    #[tokio::test]
    async fn chain_runs_in_order_before_endpoint() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let endpoint_log = Arc::clone(&log);
        let endpoint = handler(move |_ctx| {
            let log = Arc::clone(&endpoint_log);
            async move {
                log.lock().unwrap().push("handler");
                Response::new(StatusCode::Ok)
            }
        });

        let chain = vec![recorder(&log, "outer"), recorder(&log, "inner")];
        let res = Next::new(chain, endpoint).run(ctx("/")).await;

        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner", "handler"]);
    }

    #[tokio::test]
    async fn short_circuit_skips_endpoint() {
        let deny = middleware(|_ctx, _next| async { Response::new(StatusCode::Forbidden) });
        let endpoint = handler(|_ctx| async { Response::new(StatusCode::Ok) });
        let res = Next::new(vec![deny], endpoint).run(ctx("/")).await;
        assert_eq!(res.status(), StatusCode::Forbidden);
    }

    #[tokio::test]
    async fn logger_passes_response_through() {
        let endpoint = handler(|_ctx| async { Response::new(StatusCode::Created).body("ok") });
        let chain = vec![from_middleware(Arc::new(LoggerMiddleware))];
        let res = Next::new(chain, endpoint).run(ctx("/users")).await;
        assert_eq!(res.status(), StatusCode::Created);
        assert_eq!(res.text(), "ok");
    }
}
