//! Per-request context: the request plus the parameters captured by its route.

use std::collections::HashMap;

use crate::Request;

/// Path parameters extracted from the matched route pattern.
///
/// For a route declared at `/users/:id`, a request to `/users/42` yields
/// `id → "42"`.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    map: HashMap<String, String>,
}

impl PathParams {
    /// Create a new empty parameters map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value into the parameters map
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    /// Get a value from the parameters map
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Number of captured parameters
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` when the route captured nothing
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Everything a handler or middleware gets to see about the current request.
pub struct Context {
    request: Request,
    params: PathParams,
}

impl Context {
    /// Create a new context from a request, with no captured parameters
    pub fn new(request: Request) -> Self {
        Self::with_params(request, PathParams::new())
    }

    /// Create a context carrying the parameters captured by the matched route
    pub fn with_params(request: Request, params: PathParams) -> Self {
        Self { request, params }
    }

    /// The request being handled
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Parameters captured from the path, e.g. `id` for `/users/:id`
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Deserialize the request body as JSON.
    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(self.request.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    #[derive(serde::Deserialize)]
    struct NewUser {
        name: String,
    }

    #[test]
    fn params_lookup() {
        let mut params = PathParams::new();
        params.insert("id", "42");
        let ctx = Context::with_params(Request::new(Method::Get, "/users/42"), params);
        assert_eq!(ctx.params().get("id"), Some("42"));
        assert_eq!(ctx.params().get("slug"), None);
    }

    #[test]
    fn json_body() {
        let req = Request::new(Method::Post, "/users").with_body(r#"{"name":"ada"}"#);
        let user: NewUser = Context::new(req).json().unwrap();
        assert_eq!(user.name, "ada");
    }

    #[test]
    fn json_body_rejects_garbage() {
        let req = Request::new(Method::Post, "/users").with_body("not json");
        assert!(Context::new(req).json::<NewUser>().is_err());
    }
}
