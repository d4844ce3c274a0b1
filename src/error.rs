//! Unified error type.

use std::fmt;

use crate::method::Method;

/// The error type returned by burrow's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// setup failures (conflicting routes, bad config) and infrastructure
/// failures (binding a port, decoding a body on request).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two registrations cannot coexist in the trie.
    #[error("route conflict at `{pattern}`: {reason}")]
    RouteConflict { pattern: String, reason: Conflict },

    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),

    #[error("config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("body is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("template: {0}")]
    Template(#[from] minijinja::Error),
}

/// Why a registration was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// A different parameter name already owns the dynamic branch at this depth.
    Parameter { existing: String, attempted: String },
    /// The method is already registered on this exact path.
    Duplicate(Method),
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter { existing, attempted } => write!(
                f,
                "parameter `:{attempted}` collides with existing `:{existing}` at the same depth"
            ),
            Self::Duplicate(method) => write!(f, "{method} is already registered"),
        }
    }
}
