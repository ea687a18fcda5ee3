//! Resource expansion: the seven controller actions and the routes they map to.
//!
//! | Action    | Method   | Path suffix  |
//! |-----------|----------|--------------|
//! | `index`   | `GET`    | *(none)*     |
//! | `store`   | `GET`    | `/new`       |
//! | `show`    | `GET`    | `/:id`       |
//! | `edit`    | `GET`    | `/:id/edit`  |
//! | `create`  | `POST`   | *(none)*     |
//! | `update`  | `PUT`    | `/:id`       |
//! | `destroy` | `DELETE` | `/:id`       |
//!
//! Routes are always emitted in this order. Note that `store` is the `GET /new` form
//! route and `create` is the `POST` that persists; existing route tables depend on it.

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{Handler, args::Arg};
use crate::Method;

/// One of the seven conventional resource actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Index,
    Store,
    Show,
    Edit,
    Create,
    Update,
    Destroy,
}

impl Action {
    /// Every action, in the order resource routes are emitted.
    pub const ALL: [Action; 7] = [
        Action::Index,
        Action::Store,
        Action::Show,
        Action::Edit,
        Action::Create,
        Action::Update,
        Action::Destroy,
    ];

    /// The action's name as used in `only`/`except` lists.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::Store => "store",
            Action::Show => "show",
            Action::Edit => "edit",
            Action::Create => "create",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    /// HTTP method of the route this action expands to.
    pub fn method(self) -> Method {
        match self {
            Action::Index | Action::Store | Action::Show | Action::Edit => Method::Get,
            Action::Create => Method::Post,
            Action::Update => Method::Put,
            Action::Destroy => Method::Delete,
        }
    }

    /// Path suffix appended to the resource path.
    pub fn suffix(self) -> &'static str {
        match self {
            Action::Index | Action::Create => "",
            Action::Store => "/new",
            Action::Show | Action::Update | Action::Destroy => "/:id",
            Action::Edit => "/:id/edit",
        }
    }

    pub(crate) fn variant_name(self) -> &'static str {
        match self {
            Action::Index => "Index",
            Action::Store => "Store",
            Action::Show => "Show",
            Action::Edit => "Edit",
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Destroy => "Destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or(())
    }
}

/// Which actions a resource call expands to.
///
/// `only` restricts the set (default: every action) and `except` removes from it
/// (default: nothing). Unknown names are ignored. Deserializes from objects such as
/// `{"only": ["index", "show"]}`.
///
/// # Examples
///
/// ```
/// use routedef::router::{Action, ResourceOptions};
///
/// let options = ResourceOptions::new().only(["show", "index"]).except(["show"]);
/// assert_eq!(options.actions(), vec![Action::Index]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    only: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    except: Option<Vec<String>>,
}

impl ResourceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow-list of action names.
    #[must_use]
    pub fn only<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.only = Some(actions.into_iter().map(|a| a.as_ref().to_owned()).collect());
        self
    }

    /// Deny-list of action names.
    #[must_use]
    pub fn except<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.except = Some(actions.into_iter().map(|a| a.as_ref().to_owned()).collect());
        self
    }

    /// The resolved action set, in canonical order.
    pub fn actions(&self) -> Vec<Action> {
        for name in self.only.iter().chain(&self.except).flatten() {
            if name.parse::<Action>().is_err() {
                tracing::warn!(action = %name, "ignoring unknown resource action");
            }
        }

        let listed = |names: &Option<Vec<String>>, action: Action| {
            names
                .as_ref()
                .is_some_and(|names| names.iter().any(|name| name == action.as_str()))
        };

        Action::ALL
            .into_iter()
            .filter(|&action| self.only.is_none() || listed(&self.only, action))
            .filter(|&action| !listed(&self.except, action))
            .collect()
    }
}

/// A value that provides handlers for some subset of the resource actions.
///
/// Controllers are validated when the resource is declared: every resolved action must
/// return a handler, or the `resource` call fails naming the missing action and
/// [`name`](Self::name).
///
/// # Examples
///
/// ```rust
/// use routedef::router::{handler, Action, Controller, Handler};
/// use routedef::{Response, StatusCode};
///
/// struct HealthController;
///
/// impl Controller for HealthController {
///     fn action(&self, action: Action) -> Option<Handler> {
///         match action {
///             Action::Index => Some(handler(|_ctx| async { Response::new(StatusCode::Ok) })),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Controller: Send + Sync {
    /// The handler bound to `action`, if this controller implements it.
    fn action(&self, action: Action) -> Option<Handler>;

    /// Name used in error messages. Defaults to the concrete type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Wraps a controller as a resource argument.
pub fn controller<C>(controller: C) -> Arg
where
    C: Controller + 'static,
{
    Arg::Controller(Arc::new(controller))
}

impl From<Arc<dyn Controller>> for Arg {
    fn from(controller: Arc<dyn Controller>) -> Self {
        Arg::Controller(controller)
    }
}

/// A named controller assembled from individual handlers.
///
/// # Examples
///
/// ```rust
/// use routedef::router::{handler, Action, ActionMap, Controller};
/// use routedef::{Response, StatusCode};
///
/// let posts = ActionMap::new("PostController")
///     .on(Action::Index, handler(|_ctx| async { Response::new(StatusCode::Ok) }));
///
/// assert!(posts.action(Action::Index).is_some());
/// assert!(posts.action(Action::Destroy).is_none());
/// assert_eq!(posts.name(), "PostController");
/// ```
#[derive(Clone)]
pub struct ActionMap {
    name: String,
    actions: HashMap<Action, Handler>,
}

impl ActionMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: HashMap::new(),
        }
    }

    /// Binds `handler` to `action`, replacing any earlier binding.
    #[must_use]
    pub fn on(mut self, action: Action, handler: Handler) -> Self {
        self.actions.insert(action, handler);
        self
    }
}

impl fmt::Debug for ActionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        actions.sort_by_key(|action| Action::ALL.iter().position(|a| a == *action));
        f.debug_struct("ActionMap")
            .field("name", &self.name)
            .field("actions", &actions)
            .finish()
    }
}

impl Controller for ActionMap {
    fn action(&self, action: Action) -> Option<Handler> {
        self.actions.get(&action).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// An object passed where a controller was expected; it implements no actions.
pub(crate) struct ObjectController(pub(crate) &'static str);

impl Controller for ObjectController {
    fn action(&self, _action: Action) -> Option<Handler> {
        None
    }

    fn name(&self) -> &str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // ── Action table ──────────────────────────────────────────────────────────

    #[test]
    fn table_matches_canonical_mapping() {
        let table: Vec<_> = Action::ALL
            .into_iter()
            .map(|a| (a.as_str(), a.method(), a.suffix()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("index", Method::Get, ""),
                ("store", Method::Get, "/new"),
                ("show", Method::Get, "/:id"),
                ("edit", Method::Get, "/:id/edit"),
                ("create", Method::Post, ""),
                ("update", Method::Put, "/:id"),
                ("destroy", Method::Delete, "/:id"),
            ]
        );
    }

    #[test]
    fn action_parse() {
        assert_eq!("edit".parse::<Action>(), Ok(Action::Edit));
        assert!("Edit".parse::<Action>().is_err());
        assert!("list".parse::<Action>().is_err());
    }

    // ── ResourceOptions ───────────────────────────────────────────────────────

    #[test]
    fn default_resolves_every_action() {
        assert_eq!(ResourceOptions::default().actions(), Action::ALL.to_vec());
    }

    #[test]
    fn only_keeps_canonical_order() {
        let options = ResourceOptions::new().only(["create", "index"]);
        assert_eq!(options.actions(), vec![Action::Index, Action::Create]);
    }

    #[test]
    fn except_removes_actions() {
        let options = ResourceOptions::new().except(["index", "store", "show", "edit", "create"]);
        assert_eq!(options.actions(), vec![Action::Update, Action::Destroy]);
    }

    #[test]
    fn only_and_except_combine() {
        let options = ResourceOptions::new()
            .only([Action::Show, Action::Update])
            .except([Action::Update]);
        assert_eq!(options.actions(), vec![Action::Show]);
    }

    #[test]
    fn unknown_names_are_ignored() {
        let options = ResourceOptions::new().only(["index", "list"]).except(["purge"]);
        assert_eq!(options.actions(), vec![Action::Index]);
    }

    #[test]
    fn empty_only_resolves_nothing() {
        let options = ResourceOptions::new().only(Vec::<String>::new());
        assert!(options.actions().is_empty());
    }

    #[test]
    fn options_deserialize_from_json() {
        let options: ResourceOptions =
            serde_json::from_value(json!({ "except": ["destroy"], "ignored": true })).unwrap();
        assert_eq!(options, ResourceOptions::new().except(["destroy"]));
        assert_eq!(options.actions().len(), 6);
    }

    #[test]
    fn options_serialize_skips_absent_lists() {
        let json = serde_json::to_value(ResourceOptions::new().only(["index"])).unwrap();
        assert_eq!(json, json!({ "only": ["index"] }));
    }

    // ── Controllers ───────────────────────────────────────────────────────────

    struct Empty;

    impl Controller for Empty {
        fn action(&self, _action: Action) -> Option<Handler> {
            None
        }
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(Empty.name().ends_with("Empty"));
        let erased: Arc<dyn Controller> = Arc::new(Empty);
        assert!(erased.name().ends_with("Empty"));
    }

    #[test]
    fn object_controller_has_no_actions() {
        let object = ObjectController("Object");
        assert_eq!(object.name(), "Object");
        assert!(Action::ALL.into_iter().all(|a| object.action(a).is_none()));
    }
}
