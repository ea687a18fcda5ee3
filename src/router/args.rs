//! Positional arguments for route-definition calls and the matcher that resolves them.
//!
//! Calls on [`RouteBuilder`] take an argument tail whose meaning depends on the number
//! and kind of its elements. [`Arg`] is the tagged union those elements are drawn
//! from; the `resolve_*` functions match a tail against the documented shapes and
//! either return the resolved pieces or an [`InvalidRouteArguments`].

use std::{fmt, sync::Arc};

use serde_json::Value;

use super::{
    Handler, RouteBuilder,
    error::{InvalidRouteArguments, Result},
    is::{is_callback, is_middleware, is_object},
    resource::{Controller, ObjectController, ResourceOptions},
};
use crate::middleware::MiddlewareHandler;

/// One positional argument of a route-definition call.
pub enum Arg {
    /// A request handler.
    Handler(Handler),
    /// A single middleware.
    Middleware(MiddlewareHandler),
    /// A group or nested-resource callback.
    Scope(Scope),
    /// A list of arguments, normally middleware.
    List(Vec<Arg>),
    /// A resource controller.
    Controller(Arc<dyn Controller>),
    /// Resource options.
    Options(ResourceOptions),
    /// Arbitrary data. JSON objects are accepted wherever resource options are.
    Value(Value),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Handler(_) => f.write_str("Handler"),
            Arg::Middleware(_) => f.write_str("Middleware"),
            Arg::Scope(_) => f.write_str("Scope"),
            Arg::List(items) => f.debug_tuple("List").field(items).finish(),
            Arg::Controller(controller) => f.debug_tuple("Controller").field(&controller.name()).finish(),
            Arg::Options(options) => f.debug_tuple("Options").field(options).finish(),
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl Arg {
    fn into_handler(self) -> Option<Handler> {
        match self {
            Arg::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    fn into_scope(self) -> Option<Scope> {
        match self {
            Arg::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    // A single middleware, a list made only of middleware, or an empty JSON array.
    fn into_middleware(self) -> Option<Vec<MiddlewareHandler>> {
        match self {
            Arg::Middleware(middleware) => Some(vec![middleware]),
            Arg::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Arg::Middleware(middleware) => Some(middleware),
                    _ => None,
                })
                .collect(),
            Arg::Value(Value::Array(items)) if items.is_empty() => Some(Vec::new()),
            _ => None,
        }
    }

    // Any object may sit in the controller slot; non-controllers expose no actions.
    fn into_controller(self) -> Option<Arc<dyn Controller>> {
        match self {
            Arg::Controller(controller) => Some(controller),
            Arg::Options(_) => Some(Arc::new(ObjectController("ResourceOptions"))),
            Arg::Value(Value::Object(_)) => Some(Arc::new(ObjectController("Object"))),
            _ => None,
        }
    }
}

impl From<Handler> for Arg {
    fn from(handler: Handler) -> Self {
        Arg::Handler(handler)
    }
}

impl From<MiddlewareHandler> for Arg {
    fn from(middleware: MiddlewareHandler) -> Self {
        Arg::Middleware(middleware)
    }
}

impl From<Vec<MiddlewareHandler>> for Arg {
    fn from(middleware: Vec<MiddlewareHandler>) -> Self {
        Arg::List(middleware.into_iter().map(Arg::Middleware).collect())
    }
}

impl From<Scope> for Arg {
    fn from(scope: Scope) -> Self {
        Arg::Scope(scope)
    }
}

impl From<ResourceOptions> for Arg {
    fn from(options: ResourceOptions) -> Self {
        Arg::Options(options)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Value(Value::String(value.to_owned()))
    }
}

/// Callback run by `group` and nested `resource` calls with the builder positioned
/// inside the new scope.
pub struct Scope(Box<dyn FnOnce(&mut RouteBuilder) -> Result<()>>);

impl Scope {
    pub(crate) fn call(self, routes: &mut RouteBuilder) -> Result<()> {
        (self.0)(routes)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scope")
    }
}

/// Wraps a closure as a [`Scope`] for `group` and nested `resource` calls.
///
/// # Examples
///
/// ```rust
/// use routedef::router::{handler, scope, RouteBuilder};
/// use routedef::{Response, StatusCode};
///
/// # fn main() -> Result<(), routedef::router::InvalidRouteArguments> {
/// let mut routes = RouteBuilder::new();
/// routes.group("/admin", scope(|admin| {
///     admin.get("/stats", handler(|_ctx| async { Response::new(StatusCode::Ok) }))
/// }))?;
/// assert_eq!(routes.export()[0].path(), "/admin/stats");
/// # Ok(())
/// # }
/// ```
pub fn scope<F>(f: F) -> Scope
where
    F: FnOnce(&mut RouteBuilder) -> Result<()> + 'static,
{
    Scope(Box::new(f))
}

/// The argument tail of a route-definition call.
///
/// Built from a single argument, a tuple of up to five arguments, an array, or a
/// `Vec<Arg>`. The unit value `()` is an empty tail.
#[derive(Debug, Default)]
pub struct Args(Vec<Arg>);

impl Args {
    /// Returns the number of arguments in the tail.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty tail.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Args {
    type Item = Arg;
    type IntoIter = std::vec::IntoIter<Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Args(Vec::new())
    }
}

impl From<Arg> for Args {
    fn from(arg: Arg) -> Self {
        Args(vec![arg])
    }
}

impl From<Handler> for Args {
    fn from(handler: Handler) -> Self {
        Args(vec![Arg::Handler(handler)])
    }
}

impl From<Scope> for Args {
    fn from(scope: Scope) -> Self {
        Args(vec![Arg::Scope(scope)])
    }
}

impl From<Vec<Arg>> for Args {
    fn from(args: Vec<Arg>) -> Self {
        Args(args)
    }
}

impl<const N: usize> From<[Arg; N]> for Args {
    fn from(args: [Arg; N]) -> Self {
        Args(args.into())
    }
}

impl<A, B> From<(A, B)> for Args
where
    A: Into<Arg>,
    B: Into<Arg>,
{
    fn from((a, b): (A, B)) -> Self {
        Args(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for Args
where
    A: Into<Arg>,
    B: Into<Arg>,
    C: Into<Arg>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Args(vec![a.into(), b.into(), c.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for Args
where
    A: Into<Arg>,
    B: Into<Arg>,
    C: Into<Arg>,
    D: Into<Arg>,
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Args(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

impl<A, B, C, D, E> From<(A, B, C, D, E)> for Args
where
    A: Into<Arg>,
    B: Into<Arg>,
    C: Into<Arg>,
    D: Into<Arg>,
    E: Into<Arg>,
{
    fn from((a, b, c, d, e): (A, B, C, D, E)) -> Self {
        Args(vec![a.into(), b.into(), c.into(), d.into(), e.into()])
    }
}

// ── Resolved shapes ──────────────────────────────────────────────────────────

/// A verb or group call after matching: its own middleware and its callback.
pub(crate) struct Resolved<T> {
    pub middleware: Vec<MiddlewareHandler>,
    pub target: T,
}

/// A resource call after matching.
pub(crate) struct ResolvedResource {
    pub middleware: Vec<MiddlewareHandler>,
    pub controller: Arc<dyn Controller>,
    pub options: ResourceOptions,
    pub nested: Option<Scope>,
}

/// Match the tail of a verb call: `(handler)` or `(middleware, handler)`.
pub(crate) fn resolve_route(call: &'static str, args: Args) -> Result<Resolved<Handler>> {
    resolve_tail(call, args, Arg::into_handler)
}

/// Match the tail of a group call: `(scope)` or `(middleware, scope)`.
pub(crate) fn resolve_group(args: Args) -> Result<Resolved<Scope>> {
    resolve_tail("group", args, Arg::into_scope)
}

fn resolve_tail<T>(
    call: &'static str,
    args: Args,
    target: fn(Arg) -> Option<T>,
) -> Result<Resolved<T>> {
    let count = args.len();
    let mut args = args.into_iter();

    match (args.next(), args.next()) {
        (Some(callback), None) => Ok(Resolved {
            middleware: Vec::new(),
            target: callback_of(call, callback, target)?,
        }),
        (Some(middleware), Some(callback)) if count == 2 => {
            let target = callback_of(call, callback, target)?;
            if !is_middleware(&middleware) {
                return Err(InvalidRouteArguments::InvalidMiddleware { call });
            }
            let middleware = middleware
                .into_middleware()
                .ok_or(InvalidRouteArguments::InvalidMiddleware { call })?;
            Ok(Resolved { middleware, target })
        }
        _ => Err(InvalidRouteArguments::ArgumentCount { call, count }),
    }
}

// The callable must also be of the role the call expects.
fn callback_of<T>(call: &'static str, arg: Arg, target: fn(Arg) -> Option<T>) -> Result<T> {
    if !is_callback(&arg) {
        return Err(InvalidRouteArguments::MissingCallback { call });
    }
    target(arg).ok_or(InvalidRouteArguments::MissingCallback { call })
}

/// Match the tail of a resource call:
/// `[middleware,] controller [, options] [, scope]`.
///
/// The controller is the first object argument. At most one middleware argument may
/// precede it; an object right after it is the options; a callable after that is the
/// nested scope.
pub(crate) fn resolve_resource(args: Args) -> Result<ResolvedResource> {
    let count = args.len();
    if count > 4 {
        return Err(InvalidRouteArguments::ResourceArgumentCount { count });
    }

    let args: Vec<Arg> = args.into_iter().collect();
    let at = args
        .iter()
        .position(is_object)
        .ok_or(InvalidRouteArguments::MissingController)?;
    if at > 1 || (at == 1 && !is_middleware(&args[0])) {
        return Err(InvalidRouteArguments::InvalidResourceMiddleware);
    }

    let mut args = args.into_iter().peekable();
    let middleware = if at == 1 {
        args.next()
            .and_then(Arg::into_middleware)
            .ok_or(InvalidRouteArguments::InvalidResourceMiddleware)?
    } else {
        Vec::new()
    };
    let controller = args
        .next()
        .and_then(Arg::into_controller)
        .ok_or(InvalidRouteArguments::MissingController)?;

    // After consuming an argument, its 1-based position is `count - args.len()`.
    let options = match args.next_if(is_object) {
        Some(Arg::Options(options)) => options,
        Some(Arg::Value(value)) => serde_json::from_value(value)
            .map_err(|source| InvalidRouteArguments::InvalidOptions { source })?,
        Some(_) => {
            let position = count - args.len();
            return Err(InvalidRouteArguments::UnexpectedResourceArgument { position });
        }
        None => ResourceOptions::default(),
    };

    let nested = match args.next_if(is_callback) {
        Some(arg) => {
            let position = count - args.len();
            Some(
                arg.into_scope()
                    .ok_or(InvalidRouteArguments::UnexpectedResourceArgument { position })?,
            )
        }
        None => None,
    };

    match args.next() {
        Some(_) => {
            let position = count - args.len();
            Err(InvalidRouteArguments::UnexpectedResourceArgument { position })
        }
        None => Ok(ResolvedResource {
            middleware,
            controller,
            options,
            nested,
        }),
    }
}
