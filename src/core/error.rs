//! Error handling for the providergen code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every variant is fatal to a
//! generation run; nothing is retried.
//!
//! # Examples
//!
//! ```
//! use providergen::core::error::{Error, Result};
//!
//! fn might_fail(doc: Option<&str>) -> Result<&str> {
//!     doc.ok_or_else(|| Error::config("'openapi-doc' is required"))
//! }
//!
//! assert!(might_fail(None).is_err());
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Result type for providergen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for providergen operations
#[derive(Debug, Error)]
pub enum Error {
    /// Required input missing or unreadable, or an invalid setting
    #[error("Configuration error: {0}")]
    Config(String),

    /// The specification document is malformed
    #[error("Specification parse error: {0}")]
    SpecParse(String),

    /// A resolved parameter's schema type is outside the supported set
    #[error("can't generate {path:?}: parameter {parameter:?} has unsupported type {found:?}")]
    UnsupportedParameterType {
        path: String,
        parameter: String,
        found: String,
    },

    /// A resolved parameter would shadow the `path` field every artifact declares
    #[error("can't generate {path:?}: parameter {parameter:?} collides with the generated mount path field")]
    ReservedParameterName { path: String, parameter: String },

    /// A fixed template failed to parse or execute
    #[error("Template error: {0}")]
    Template(String),

    /// Directory creation or file write failure
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new specification parse error
    pub fn spec_parse<S: Into<String>>(msg: S) -> Self {
        Self::SpecParse(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Wrap an I/O error with the path it happened at
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<tera::Error> for Error {
    fn from(err: tera::Error) -> Self {
        // Tera nests the useful message (missing variable, bad filter) in its source chain.
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Template(msg)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SpecParse(format!("invalid JSON: {err}"))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SpecParse(format!("invalid YAML: {err}"))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid configuration file: {err}"))
    }
}
