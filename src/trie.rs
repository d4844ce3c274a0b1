//! Segment trie for route matching.
//!
//! Each node is one `/`-delimited path segment. A node owns any number of
//! static children keyed by their literal and at most one dynamic child
//! bound to a parameter name (`:id`). Lookup walks one node per segment, so
//! it costs O(segments) no matter how many routes are registered.
//!
//! At every depth a static child beats the dynamic child. There is no
//! backtracking: once a static child matches, the dynamic sibling is not
//! tried for the remaining segments.

use std::collections::HashMap;

use crate::error::{Conflict, Error};
use crate::method::Method;
use crate::params::Params;
use crate::route::{Route, RouteTable};

const PARAM_MARKER: char = ':';

#[derive(Default)]
pub(crate) struct Node {
    statics: HashMap<String, Node>,
    dynamic: Option<Box<Dynamic>>,
    pub(crate) routes: RouteTable,
}

struct Dynamic {
    name: String,
    node: Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Static(&'a str),
    Param(&'a str),
}

#[derive(Default)]
pub(crate) struct Trie {
    root: Node,
}

impl Trie {
    /// Registers `route` for `method` at `pattern`.
    ///
    /// The trie is left untouched on error.
    pub(crate) fn insert(&mut self, method: Method, pattern: &str, route: Route) -> Result<(), Error> {
        let segments = parse(pattern)?;
        self.check(method, pattern, &segments)?;

        let mut node = &mut self.root;
        for segment in segments {
            node = match segment {
                Segment::Static(literal) => node.statics.entry(literal.to_owned()).or_default(),
                Segment::Param(name) => {
                    let dynamic = node.dynamic.get_or_insert_with(|| {
                        Box::new(Dynamic { name: name.to_owned(), node: Node::default() })
                    });
                    &mut dynamic.node
                }
            };
        }
        node.routes.set(method, route);
        Ok(())
    }

    /// Walks the existing nodes along `segments` looking for conflicts.
    fn check(&self, method: Method, pattern: &str, segments: &[Segment<'_>]) -> Result<(), Error> {
        let conflict = |reason| Error::RouteConflict { pattern: pattern.to_owned(), reason };

        let mut node = &self.root;
        for segment in segments {
            let next = match *segment {
                Segment::Static(literal) => node.statics.get(literal),
                Segment::Param(name) => match &node.dynamic {
                    Some(dynamic) if dynamic.name != name => {
                        return Err(conflict(Conflict::Parameter {
                            existing: dynamic.name.clone(),
                            attempted: name.to_owned(),
                        }));
                    }
                    Some(dynamic) => Some(&dynamic.node),
                    None => None,
                },
            };
            match next {
                Some(child) => node = child,
                // Everything below is new, nothing left to collide with.
                None => return Ok(()),
            }
        }

        if node.routes.get(method).is_some() {
            return Err(conflict(Conflict::Duplicate(method)));
        }
        Ok(())
    }

    /// Resolves `path` to a node, binding parameters on the way down.
    ///
    /// `path` must already be percent-decoded. Empty segments are skipped,
    /// so `/a//b/` and `/a/b` land on the same node.
    pub(crate) fn resolve(&self, path: &str) -> (Option<&Node>, Params) {
        let mut params = Params::new();
        let mut node = &self.root;

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if let Some(child) = node.statics.get(segment) {
                node = child;
                continue;
            }
            match &node.dynamic {
                Some(dynamic) => {
                    params.push(dynamic.name.clone(), segment.to_owned());
                    node = &dynamic.node;
                }
                None => return (None, params),
            }
        }
        (Some(node), params)
    }
}

fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, Error> {
    let invalid = |reason| Error::InvalidPattern { pattern: pattern.to_owned(), reason };

    if !pattern.starts_with('/') {
        return Err(invalid("must begin with `/`"));
    }

    let mut segments = Vec::new();
    for raw in pattern.split('/').filter(|s| !s.is_empty()) {
        let segment = match raw.strip_prefix(PARAM_MARKER) {
            Some("") => return Err(invalid("empty parameter name")),
            Some(name) if segments.contains(&Segment::Param(name)) => {
                return Err(invalid("parameter name repeated"));
            }
            Some(name) => Segment::Param(name),
            None => Segment::Static(raw),
        };
        segments.push(segment);
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::request::Request;
    use crate::response::Response;

    fn route() -> Route {
        Route::new(|_req: Request| async { Response::status(StatusCode::OK) })
    }

    fn trie(patterns: &[&str]) -> Trie {
        let mut trie = Trie::default();
        for pattern in patterns {
            trie.insert(Method::Get, pattern, route()).unwrap();
        }
        trie
    }

    fn matched(trie: &Trie, path: &str) -> Option<Params> {
        match trie.resolve(path) {
            (Some(node), params) if node.routes.get(Method::Get).is_some() => Some(params),
            _ => None,
        }
    }

    #[test]
    fn static_paths_match_exactly() {
        let trie = trie(&["/a/b"]);
        assert!(matched(&trie, "/a/b").is_some());
        assert!(matched(&trie, "/a/c").is_none());
        assert!(matched(&trie, "/a/b/c").is_none());
    }

    #[test]
    fn root_pattern_is_the_root_node() {
        let trie = trie(&["/"]);
        assert!(matched(&trie, "/").is_some());
        assert!(matched(&trie, "").is_some());
    }

    #[test]
    fn dynamic_segment_binds_its_value() {
        let trie = trie(&["/users/:id"]);
        let params = matched(&trie, "/users/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn binds_several_parameters_in_order() {
        let trie = trie(&["/users/:user/posts/:post"]);
        let params = matched(&trie, "/users/7/posts/99").unwrap();
        assert_eq!(params.iter().collect::<Vec<_>>(), [("user", "7"), ("post", "99")]);
    }

    #[test]
    fn static_beats_dynamic_at_the_same_depth() {
        let trie = trie(&["/users/:id", "/users/self"]);
        assert!(matched(&trie, "/users/self").unwrap().is_empty());
        assert_eq!(matched(&trie, "/users/99").unwrap().get("id"), Some("99"));
    }

    #[test]
    fn static_match_does_not_backtrack() {
        let trie = trie(&["/users/:id", "/users/self/posts"]);
        // `self` takes the static branch, which has no GET route of its own.
        assert!(matched(&trie, "/users/self").is_none());
    }

    #[test]
    fn empty_segments_are_skipped() {
        let trie = trie(&["/a/b"]);
        assert!(matched(&trie, "/a//b").is_some());
        assert!(matched(&trie, "/a/b/").is_some());
        assert!(matched(&trie, "//a/b//").is_some());
    }

    #[test]
    fn segments_match_verbatim() {
        let trie = trie(&["/files/:name", "/hello world"]);
        assert_eq!(matched(&trie, "/files/a b.txt").unwrap().get("name"), Some("a b.txt"));
        assert!(matched(&trie, "/hello world").is_some());
        assert!(matched(&trie, "/hello%20world").is_none());
    }

    #[test]
    fn miss_returns_no_node_and_partial_params() {
        let trie = trie(&["/users/:id/posts"]);
        let (node, params) = trie.resolve("/users/5/comments");
        assert!(node.is_none());
        assert_eq!(params.get("id"), Some("5"));
    }

    #[test]
    fn different_parameter_names_at_one_depth_conflict() {
        let mut trie = trie(&["/users/:id"]);
        let err = trie.insert(Method::Post, "/users/:user_id/posts", route()).unwrap_err();
        assert!(matches!(
            err,
            Error::RouteConflict { reason: Conflict::Parameter { ref existing, ref attempted }, .. }
                if existing == "id" && attempted == "user_id"
        ));
    }

    #[test]
    fn same_parameter_name_is_shared() {
        let mut trie = trie(&["/users/:id"]);
        trie.insert(Method::Get, "/users/:id/posts", route()).unwrap();
        assert_eq!(matched(&trie, "/users/3/posts").unwrap().get("id"), Some("3"));
    }

    #[test]
    fn duplicate_method_and_path_conflicts() {
        let mut trie = trie(&["/users/:id"]);
        let err = trie.insert(Method::Get, "/users/:id/", route()).unwrap_err();
        assert!(matches!(err, Error::RouteConflict { reason: Conflict::Duplicate(Method::Get), .. }));
        trie.insert(Method::Delete, "/users/:id", route()).unwrap();
    }

    #[test]
    fn rejected_insert_keeps_existing_routes() {
        let mut trie = trie(&["/users/:id"]);
        assert!(trie.insert(Method::Get, "/users/:name", route()).is_err());
        assert_eq!(matched(&trie, "/users/1").unwrap().get("id"), Some("1"));
        assert!(trie.resolve("/users/1").0.unwrap().routes.get(Method::Post).is_none());
    }

    #[test]
    fn rejects_malformed_patterns() {
        let mut trie = Trie::default();
        for pattern in ["users", "/users/:", "/a/:id/b/:id"] {
            assert!(
                matches!(trie.insert(Method::Get, pattern, route()), Err(Error::InvalidPattern { .. })),
                "{pattern} should be rejected"
            );
        }
    }
}
