use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use super::{
    Handler,
    args::{self, Args, Resolved, ResolvedResource, Scope},
    error::{InvalidRouteArguments, Result},
    path,
    record::{RouteRecord, RouteSummary},
};
use crate::{Method, middleware::MiddlewareHandler};

/// Stateful builder for route definitions.
///
/// Verb methods append one [`RouteRecord`] each; [`group`](Self::group) and
/// [`resource`](Self::resource) open a scope whose path prefix and middleware apply to
/// everything declared inside it. Scopes are entered by calling back into the same
/// builder, so nesting composes naturally:
///
/// ```rust
/// use routedef::router::{handler, scope, RouteBuilder};
/// use routedef::{Response, StatusCode};
///
/// # fn main() -> Result<(), routedef::router::InvalidRouteArguments> {
/// let h = handler(|_ctx| async { Response::new(StatusCode::Ok) });
///
/// let mut routes = RouteBuilder::new();
/// routes.group("/a", scope(move |a| {
///     a.group("/b", scope(move |b| b.get("/c", h)))
/// }))?;
///
/// assert_eq!(routes.export()[0].path(), "/a/b/c");
/// # Ok(())
/// # }
/// ```
///
/// Every call validates its arguments before touching any state, so a failed call
/// appends nothing. [`export`](Self::export) is read-only: the builder keeps
/// accumulating, and each export is a snapshot of everything declared so far.
#[derive(Default)]
pub struct RouteBuilder {
    routes: Vec<RouteRecord>,
    prefixes: Vec<String>,
    // One batch per open scope that supplied middleware.
    middleware: Vec<Vec<MiddlewareHandler>>,
}

impl RouteBuilder {
    /// Create a builder with no routes and no open scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a `GET` route: `(handler)` or `(middleware, handler)`.
    ///
    /// # Arguments
    ///
    /// - `path`: route path, joined onto the prefixes of every open scope.
    /// - `args`: a [`Handler`], or a tuple of middleware (one or a `Vec`) and a handler.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRouteArguments`] when the tail matches neither shape.
    pub fn get(&mut self, path: &str, args: impl Into<Args>) -> Result<()> {
        self.route(Method::Get, path, args)
    }

    /// Declare a `POST` route: `(handler)` or `(middleware, handler)`.
    pub fn post(&mut self, path: &str, args: impl Into<Args>) -> Result<()> {
        self.route(Method::Post, path, args)
    }

    /// Declare a `PUT` route: `(handler)` or `(middleware, handler)`.
    pub fn put(&mut self, path: &str, args: impl Into<Args>) -> Result<()> {
        self.route(Method::Put, path, args)
    }

    /// Declare a `PATCH` route: `(handler)` or `(middleware, handler)`.
    pub fn patch(&mut self, path: &str, args: impl Into<Args>) -> Result<()> {
        self.route(Method::Patch, path, args)
    }

    /// Declare a `DELETE` route: `(handler)` or `(middleware, handler)`.
    pub fn delete(&mut self, path: &str, args: impl Into<Args>) -> Result<()> {
        self.route(Method::Delete, path, args)
    }

    /// Declare a route for `method`. The verb methods delegate here.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRouteArguments`] when the tail matches neither shape; nothing
    /// is appended in that case.
    pub fn route(&mut self, method: Method, path: &str, args: impl Into<Args>) -> Result<()> {
        let Resolved { middleware, target } =
            args::resolve_route(method.builder_call(), args.into())?;
        let path = self.scoped_path(&[path]);
        self.push_route(method, path, &middleware, target);
        Ok(())
    }

    /// Open a scope: `(scope)` or `(middleware, scope)`.
    ///
    /// Routes declared by the scope callback get `path` prefixed and `middleware`
    /// prepended to their own. If the callback fails or panics, the routes it declared
    /// are discarded; an error is then returned and a panic keeps unwinding.
    pub fn group(&mut self, path: &str, args: impl Into<Args>) -> Result<()> {
        let Resolved { middleware, target } = args::resolve_group(args.into())?;
        self.atomically(|routes| routes.nest(path, middleware, target))
    }

    /// Declare a resource: `[middleware,] controller [, options] [, scope]`.
    ///
    /// Expands to one route per resolved [`Action`](super::Action), in canonical order,
    /// each bound to the controller's handler for that action. A nested scope runs
    /// afterwards with `path` as its prefix and the resource middleware inherited.
    ///
    /// # Errors
    ///
    /// Fails before appending anything when the arguments match no shape or the
    /// controller lacks one of the resolved actions.
    pub fn resource(&mut self, path: &str, args: impl Into<Args>) -> Result<()> {
        let ResolvedResource {
            middleware,
            controller,
            options,
            nested,
        } = args::resolve_resource(args.into())?;

        let bindings = options
            .actions()
            .into_iter()
            .map(|action| {
                controller
                    .action(action)
                    .map(|handler| (action, handler))
                    .ok_or_else(|| InvalidRouteArguments::MissingAction {
                        controller: controller.name().to_owned(),
                        action,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        self.atomically(|routes| {
            for (action, handler) in bindings {
                let full = routes.scoped_path(&[path, action.suffix()]);
                routes.push_route(action.method(), full, &middleware, handler);
            }
            match nested {
                Some(scope) => routes.nest(path, middleware, scope),
                None => Ok(()),
            }
        })
    }

    /// A snapshot of every route declared so far.
    pub fn export(&self) -> Vec<RouteRecord> {
        self.routes.clone()
    }

    /// Consume the builder, returning its routes.
    pub fn into_routes(self) -> Vec<RouteRecord> {
        self.routes
    }

    /// Serializable listing of the routes declared so far.
    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes.iter().map(RouteRecord::summary).collect()
    }

    /// Returns the number of routes declared so far.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes have been declared.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of `group`/`resource` scopes currently open.
    pub fn depth(&self) -> usize {
        self.prefixes.len()
    }

    fn scoped_path(&self, pieces: &[&str]) -> String {
        path::join(
            self.prefixes
                .iter()
                .map(String::as_str)
                .chain(pieces.iter().copied()),
        )
    }

    fn push_route(
        &mut self,
        method: Method,
        path: String,
        own: &[MiddlewareHandler],
        handler: Handler,
    ) {
        let middleware: Vec<_> = self.middleware.iter().flatten().chain(own).cloned().collect();
        tracing::debug!(%method, %path, middleware = middleware.len(), "route defined");
        self.routes.push(RouteRecord::new(method, path, middleware, handler));
    }

    fn nest(&mut self, prefix: &str, middleware: Vec<MiddlewareHandler>, scope: Scope) -> Result<()> {
        let mut guard = ScopeGuard::enter(self, prefix, middleware);
        scope.call(&mut guard)
    }

    // Run `f`; unless it returns `Ok`, drop every route it appended.
    fn atomically(&mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let mut rollback = Rollback::begin(self);
        let result = f(&mut *rollback);
        if result.is_ok() {
            rollback.commit();
        }
        result
    }
}

impl fmt::Debug for RouteBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBuilder")
            .field("routes", &self.routes)
            .field("prefixes", &self.prefixes)
            .field("middleware", &self.middleware.iter().map(Vec::len).collect::<Vec<_>>())
            .finish()
    }
}

// Pushes a prefix (and middleware, if any) on creation and pops them on drop, so the
// stacks are balanced on every exit path, unwinding included.
struct ScopeGuard<'a> {
    routes: &'a mut RouteBuilder,
    pushed_middleware: bool,
}

impl<'a> ScopeGuard<'a> {
    fn enter(routes: &'a mut RouteBuilder, prefix: &str, middleware: Vec<MiddlewareHandler>) -> Self {
        routes.prefixes.push(prefix.to_owned());
        let pushed_middleware = !middleware.is_empty();
        if pushed_middleware {
            routes.middleware.push(middleware);
        }
        tracing::trace!(prefix, depth = routes.depth(), "entered route scope");
        Self {
            routes,
            pushed_middleware,
        }
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = RouteBuilder;

    fn deref(&self) -> &RouteBuilder {
        self.routes
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut RouteBuilder {
        self.routes
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let prefix = self.routes.prefixes.pop();
        if self.pushed_middleware {
            self.routes.middleware.pop();
        }
        tracing::trace!(prefix = ?prefix, depth = self.routes.depth(), "left route scope");
    }
}

// Truncates the route list back to its length at `begin` when dropped uncommitted,
// which covers both an `Err` return and an unwinding panic.
struct Rollback<'a> {
    routes: &'a mut RouteBuilder,
    mark: usize,
    committed: bool,
}

impl<'a> Rollback<'a> {
    fn begin(routes: &'a mut RouteBuilder) -> Self {
        let mark = routes.routes.len();
        Self {
            routes,
            mark,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Deref for Rollback<'_> {
    type Target = RouteBuilder;

    fn deref(&self) -> &RouteBuilder {
        self.routes
    }
}

impl DerefMut for Rollback<'_> {
    fn deref_mut(&mut self) -> &mut RouteBuilder {
        self.routes
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        let appended = self.routes.routes.len().saturating_sub(self.mark);
        if !self.committed && appended > 0 {
            tracing::debug!(discarded = appended, "rolling back failed route scope");
            self.routes.routes.truncate(self.mark);
        }
    }
}
