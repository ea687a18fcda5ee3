//! Path joining for nested route definitions.
//!
//! Every route path is produced by [`join`], so the result is the same however many
//! groups contributed segments and however those segments were slashed:
//!
//! - always starts with `/`
//! - never contains `//`
//! - never ends with `/`, except for the root path `/`

/// Join path pieces into one normalized route path.
///
/// # Examples
///
/// ```
/// use routedef::router::path::join;
///
/// assert_eq!(join(["/a", "/b", "/c"]), "/a/b/c");
/// assert_eq!(join(["/api/", "/users/"]), "/api/users");
/// assert_eq!(join(["users", ":id"]), "/users/:id");
/// assert_eq!(join(["/", "/"]), "/");
/// ```
pub fn join<'a, I>(pieces: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut path = String::new();
    for segment in pieces
        .into_iter()
        .flat_map(|piece| piece.split('/'))
        .filter(|segment| !segment.is_empty())
    {
        path.push('/');
        path.push_str(segment);
    }

    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Normalize a single path.
pub fn normalize(path: &str) -> String {
    join([path])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_root() {
        assert_eq!(join([]), "/");
        assert_eq!(join([""]), "/");
        assert_eq!(normalize("//"), "/");
    }

    #[test]
    fn doubled_separators_collapse() {
        assert_eq!(normalize("/path//to///page"), "/path/to/page");
        assert_eq!(join(["/a/", "/b"]), "/a/b");
    }

    #[test]
    fn trailing_slash_stripped() {
        assert_eq!(normalize("/users/"), "/users");
        assert_eq!(join(["/users", "/"]), "/users");
    }

    #[test]
    fn relative_segments_get_a_leading_slash() {
        assert_eq!(join(["admin", "stats"]), "/admin/stats");
    }

    #[test]
    fn deep_nesting_stays_single_slashed() {
        let pieces = ["/", "/v1/", "//users", ":id/", "/posts", ""];
        assert_eq!(join(pieces), "/v1/users/:id/posts");
    }

    #[test]
    fn resource_suffix_joins() {
        assert_eq!(join(["/users", "/:id/edit"]), "/users/:id/edit");
        assert_eq!(join(["/users", ""]), "/users");
    }
}
