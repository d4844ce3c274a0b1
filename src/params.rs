//! Read-only accessors over route parameters, query strings and headers.
//!
//! Every reader answers the same four questions: is the key there
//! ([`has`](Params::has)), what is its value ([`get`](Params::get)), what is
//! its value or a fallback ([`get_or`](Params::get_or)), and, for the
//! multi-valued readers, every value it carries
//! ([`get_all`](Values::get_all)).

use http::HeaderMap;

// ── Params ────────────────────────────────────────────────────────────────────

/// Route parameters extracted while resolving a request path.
///
/// Built fresh per lookup and owned by the request. For the pattern
/// `/users/:id` and the path `/users/42`, `params.get("id")` is `Some("42")`.
/// Parameters are single-valued: a pattern may not repeat a name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, name: String, value: String) {
        self.0.push((name, value));
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Parameters in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Values ────────────────────────────────────────────────────────────────────

/// A multi-valued key/value reader (query parameters or headers).
///
/// Header readers compare keys case-insensitively; query readers do not.
#[derive(Clone, Debug, Default)]
pub struct Values {
    entries: Vec<(String, String)>,
    fold_case: bool,
}

impl Values {
    /// Parses an `application/x-www-form-urlencoded` query string.
    pub(crate) fn from_query(query: Option<&str>) -> Self {
        let entries = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self { entries, fold_case: false }
    }

    /// Header values that are not visible ASCII are skipped.
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        let entries = headers
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        Self { entries, fold_case: true }
    }

    fn matches(&self, candidate: &str, key: &str) -> bool {
        if self.fold_case {
            candidate.eq_ignore_ascii_case(key)
        } else {
            candidate == key
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).next()
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Every value for `key`, in arrival order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(k, _)| self.matches(k, key))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
