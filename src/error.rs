//! Error types for reqcache operations.
//!
//! This module defines [`ReqCacheError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Nothing in the cache core recovers from these errors locally; every
//!   variant propagates to the command layer, which decides presentation
//!   and exit code
//! - Installer failures are never turned into a "skip"
//! - Use `anyhow::Error` (via `ReqCacheError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for reqcache operations.
#[derive(Debug, Error)]
pub enum ReqCacheError {
    /// Malformed build configuration passed to the identity engine.
    #[error("Invalid build configuration: {message}")]
    ConfigurationError { message: String },

    /// The recipe's installer callback failed.
    #[error("System requirements for '{recipe}' failed: {message}")]
    InstallerExecution { recipe: String, message: String },

    /// A cache path could not be read or written.
    #[error("Cache I/O error at {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A per-key lock could not be acquired in time.
    #[error("Timed out after {waited:?} waiting for cache lock '{key}'")]
    LockTimeout { key: String, waited: Duration },

    /// A recipe or package reference did not parse.
    #[error("Invalid reference '{reference}': {message}")]
    InvalidReference { reference: String, message: String },

    /// A removal pattern did not compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Configuration or recipe file not found at expected location.
    #[error("File not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration or recipe file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A destructive command needs confirmation that cannot be asked for.
    #[error("Refusing to {action} without confirmation; pass --force")]
    ConfirmationRequired { action: String },

    /// Shell command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReqCacheError {
    /// Wrap an IO error with the cache path it concerns.
    pub fn cache_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheIo {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Whether retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LockTimeout { .. } | Self::InstallerExecution { .. }
        )
    }
}

/// Result type alias for reqcache operations.
pub type Result<T> = std::result::Result<T, ReqCacheError>;
