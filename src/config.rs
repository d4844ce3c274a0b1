//! Router configuration.
//!
//! ```toml
//! # Collapse `.`, `..` and repeated `/` before matching.
//! sanitize_paths = true
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Settings applied to every request the router dispatches.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Normalize the request path before resolving it. With this off, `.`
    /// and `..` are matched as literal segments (empty segments are skipped
    /// either way).
    pub sanitize_paths: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { sanitize_paths: true }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
        assert!(Config::default().sanitize_paths);
    }

    #[test]
    fn reads_sanitize_paths() {
        let config = Config::from_toml_str("sanitize_paths = false").unwrap();
        assert!(!config.sanitize_paths);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(Config::from_toml_str("santize_paths = true"), Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(Config::load("/nonexistent/burrow.toml"), Err(Error::Io(_))));
    }
}
