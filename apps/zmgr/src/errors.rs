//! Error types for the zmgr CLI.
//!
//! `ZmgrError` is the typed error returned by the toolchain core. Commands
//! wrap it in `anyhow::Error` for context, and `main` downcasts back to it to
//! pick a process exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the toolchain core.
pub type Result<T> = std::result::Result<T, ZmgrError>;

/// Consolidated error type for zmgr operations.
///
/// "Not found" conditions never appear here: detection boundaries normalize
/// them to `bool` or `Option` so that an absent tool and a broken tool are
/// always distinguishable.
#[derive(Debug, Error)]
pub enum ZmgrError {
    /// Target identifier is malformed.
    #[error("invalid target identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// The identifier as supplied by the caller.
        identifier: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The operation needs an installed target that is absent.
    #[error("target not installed: {identifier}")]
    TargetNotInstalled {
        /// The identifier that was looked up.
        identifier: String,
    },

    /// A binary was found but could not report its version.
    #[error("version query failed for {}: {reason}", path.display())]
    VersionQueryFailed {
        /// Path of the binary that was invoked.
        path: PathBuf,
        /// Why the query failed.
        reason: String,
    },

    /// Writing a generated config file failed.
    #[error("failed to write config file {}", path.display())]
    ConfigWriteFailed {
        /// Destination file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other filesystem error.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O operation that failed.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ZmgrError {
    /// Creates a new `InvalidIdentifier` error.
    #[must_use]
    pub fn invalid_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `TargetNotInstalled` error.
    #[must_use]
    pub fn target_not_installed(identifier: impl Into<String>) -> Self {
        Self::TargetNotInstalled {
            identifier: identifier.into(),
        }
    }

    /// Creates a new `VersionQueryFailed` error.
    #[must_use]
    pub fn version_query_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::VersionQueryFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `ConfigWriteFailed` error.
    #[must_use]
    pub fn config_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Creates a new `Io` error with context.
    #[must_use]
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns the process exit code used when this error reaches `main`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidIdentifier { .. } => 2,
            Self::TargetNotInstalled { .. } => 3,
            Self::VersionQueryFailed { .. } => 4,
            Self::ConfigWriteFailed { .. } => 5,
            Self::Io { .. } => 1,
        }
    }
}
