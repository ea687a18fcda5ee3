use thiserror::Error;

use super::resource::Action;

/// Result alias for route-definition calls.
pub type Result<T, E = InvalidRouteArguments> = std::result::Result<T, E>;

/// A route-definition call was made with arguments that match none of its shapes.
///
/// These are programmer errors in static route code and are meant to fail fast at
/// startup. [`example`](Self::example) returns a corrective snippet for the common cases.
#[derive(Debug, Error)]
pub enum InvalidRouteArguments {
    #[error("`{call}` expects a callback as its last argument")]
    MissingCallback { call: &'static str },

    #[error(
        "when `{call}` is given two arguments, the first must be a middleware or a list of middleware"
    )]
    InvalidMiddleware { call: &'static str },

    #[error("`{call}` accepts one or two arguments after the path, got {count}")]
    ArgumentCount { call: &'static str, count: usize },

    #[error("`resource` expects a controller object")]
    MissingController,

    #[error("`resource` accepts at most one middleware argument before the controller")]
    InvalidResourceMiddleware,

    #[error("unexpected argument at position {position} of `resource`")]
    UnexpectedResourceArgument { position: usize },

    #[error("`resource` accepts one to four arguments after the path, got {count}")]
    ResourceArgumentCount { count: usize },

    #[error("controller `{controller}` does not implement the `{action}` action")]
    MissingAction { controller: String, action: Action },

    #[error("invalid resource options: {source}")]
    InvalidOptions {
        #[source]
        source: serde_json::Error,
    },
}

impl InvalidRouteArguments {
    /// A corrected call for the misuse this error describes, when one exists.
    pub fn example(&self) -> Option<String> {
        match self {
            Self::MissingCallback { call: "group" } => Some(
                "routes.group(\"/base-route\", scope(|routes| {\n    \
                 routes.get(\"/nested-route\", handler(index))?;\n    Ok(())\n}))?;"
                    .to_owned(),
            ),
            Self::MissingCallback { call } => {
                Some(format!("routes.{call}(\"/path\", handler(index))?;"))
            }
            Self::InvalidMiddleware { call: "group" } => Some(
                "routes.group(\"/base-route\", (vec![auth], scope(|routes| {\n    \
                 routes.get(\"/nested-route\", handler(index))?;\n    Ok(())\n})))?;"
                    .to_owned(),
            ),
            Self::InvalidMiddleware { call } => Some(format!(
                "routes.{call}(\"/path\", (vec![auth, audit], handler(index)))?;"
            )),
            Self::MissingController
            | Self::InvalidResourceMiddleware
            | Self::UnexpectedResourceArgument { .. } => Some(RESOURCE_SHAPES.to_owned()),
            Self::MissingAction { controller, action } => Some(format!(
                "impl Controller for {controller} {{\n    \
                 fn action(&self, action: Action) -> Option<Handler> {{\n        \
                 match action {{\n            \
                 Action::{variant} => Some(handler(..)),\n            \
                 _ => None,\n        }}\n    }}\n}}",
                variant = action.variant_name(),
            )),
            Self::ArgumentCount { .. }
            | Self::ResourceArgumentCount { .. }
            | Self::InvalidOptions { .. } => None,
        }
    }
}

const RESOURCE_SHAPES: &str = "\
routes.resource(\"/users\", controller(users))?;
routes.resource(\"/users\", (auth, controller(users)))?;
routes.resource(\"/users\", (controller(users), ResourceOptions::new().only([\"index\"])))?;
routes.resource(\"/users\", (controller(users), scope(|users| Ok(()))))?;
routes.resource(\"/users\", (auth, controller(users), ResourceOptions::default(), scope(|users| Ok(()))))?;";
