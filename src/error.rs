//! Error types for route discovery and registration.
//!
//! Skipping a file (no controller, no routes, outside the base path) is never
//! an error; these types cover the cases that must be reported.

use std::path::PathBuf;

/// Failure while resolving, loading, extracting or registering routes.
#[derive(Debug, thiserror::Error)]
pub enum RegistrarError {
    /// The controller file could not be read or parsed as Rust source.
    #[error("failed to load controller from {}: {reason}", .path.display())]
    ClassLoad {
        /// File that failed to load
        path: PathBuf,
        /// Reader or parser message (with line information when available)
        reason: String,
    },

    /// A route attribute is malformed or no URI can be derived for it.
    #[error("invalid route metadata on {class} ({member}): {message}")]
    InvalidMetadata {
        /// Fully-qualified controller identifier
        class: String,
        /// Method name, or `class attributes` for struct-level declarations
        member: String,
        /// What is wrong with the declaration
        message: String,
    },

    /// A directory handed to `register_directory` is missing or unreadable.
    #[error("route directory {} could not be read: {source}", .path.display())]
    Directory {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The directory configuration could not be normalized.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RegistrarError {
    pub(crate) fn invalid(
        class: impl Into<String>,
        member: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistrarError::InvalidMetadata {
            class: class.into(),
            member: member.into(),
            message: message.into(),
        }
    }
}

/// Failure while loading or validating the route-attributes configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// Configuration file path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML, TOML or JSON for this schema.
    #[error("failed to parse config {}: {message}", .path.display())]
    Parse {
        /// Configuration file path
        path: PathBuf,
        /// Deserializer message
        message: String,
    },

    /// The configuration parsed but describes something unusable.
    #[error("invalid route-attributes config: {0}")]
    Invalid(String),
}
