//! Argument classifier: total predicates used to disambiguate overloaded calls.
//!
//! None of these functions fail; every [`Arg`] is classified.

use serde_json::Value;

use super::args::Arg;

/// `true` if `arg` is a callable: a handler, a middleware, or a scope callback.
pub fn is_callback(arg: &Arg) -> bool {
    matches!(arg, Arg::Handler(_) | Arg::Middleware(_) | Arg::Scope(_))
}

/// `true` if `arg` is a list whose every element is callable.
///
/// An empty list is vacuously a list of callbacks, and so is an empty JSON array.
pub fn is_array_of_callbacks(arg: &Arg) -> bool {
    match arg {
        Arg::List(items) => items.iter().all(is_callback),
        Arg::Value(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// `true` if `arg` is a structured, non-list value: a controller, resource options,
/// or a JSON object.
pub fn is_object(arg: &Arg) -> bool {
    matches!(
        arg,
        Arg::Controller(_) | Arg::Options(_) | Arg::Value(Value::Object(_))
    )
}

/// `true` if `arg` can stand in the middleware slot of a call.
pub fn is_middleware(arg: &Arg) -> bool {
    is_callback(arg) || is_array_of_callbacks(arg)
}
