//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods. Each method owns one slot in a
//! fixed-size per-node route table, so lookup is an array index.
//!
//! Unknown method strings have no slot. They are never an error at request
//! time: the dispatcher routes them to the not-found endpoint.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A known HTTP method.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Connect,
    Trace,
}

impl Method {
    /// Number of supported methods, i.e. slots per route table.
    pub const COUNT: usize = 9;

    pub const ALL: [Method; Self::COUNT] = [
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
        Self::Connect,
        Self::Trace,
    ];

    /// Slot of this method in a route table, in `0..Method::COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Delete  => "DELETE",
            Self::Get     => "GET",
            Self::Head    => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch   => "PATCH",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Trace   => "TRACE",
        }
    }

    /// Maps a wire method onto the fixed domain. `None` is the "unsupported"
    /// sentinel for extension methods (`PURGE`, WebDAV verbs, typos).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONNECT" => Some(Self::Connect),
            "DELETE"  => Some(Self::Delete),
            "GET"     => Some(Self::Get),
            "HEAD"    => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            "PATCH"   => Some(Self::Patch),
            "POST"    => Some(Self::Post),
            "PUT"     => Some(Self::Put),
            "TRACE"   => Some(Self::Trace),
            _         => None,
        }
    }

    pub fn from_http(method: &http::Method) -> Option<Self> {
        Self::parse(method.as_str())
    }
}

/// Parses an uppercase method string (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnsupportedMethod(s.to_owned()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_cover_the_table_exactly_once() {
        let mut seen = [false; Method::COUNT];
        for method in Method::ALL {
            assert!(!seen[method.index()], "{method} shares a slot");
            seen[method.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn wire_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn unknown_and_lowercase_methods_are_unsupported() {
        assert_eq!(Method::parse("PURGE"), None);
        assert_eq!(Method::parse("get"), None);
        assert!(matches!("BREW".parse::<Method>(), Err(Error::UnsupportedMethod(m)) if m == "BREW"));
    }

    #[test]
    fn maps_from_http_method() {
        assert_eq!(Method::from_http(&http::Method::PATCH), Some(Method::Patch));
        let purge = http::Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(Method::from_http(&purge), None);
    }
}
