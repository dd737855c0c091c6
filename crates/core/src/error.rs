//! Error types for jsonkv
//!
//! This module defines every error the store can report.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! | Category | Variants | Description |
//! |----------|----------|-------------|
//! | Validation | `InvalidKey`, `InvalidValue` | Bad caller input |
//! | Not Found | `KeyNotFound`, `BackupNotFound` | Entity doesn't exist |
//! | Type | `TypeMismatch` | Existing value has the wrong kind |
//! | Storage | `CorruptDocument`, `Io` | Backing file problems |
//! | State | `BackupExists` | Snapshot would be overwritten |
//! | Concurrency | `Timeout` | Lock not acquired in time |
//! | Setup | `Config` | Bad configuration file |

use crate::value::ValueKind;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for jsonkv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the jsonkv store
#[derive(Debug, Error)]
pub enum Error {
    /// Key is empty or otherwise unusable
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },

    /// Value is null, an amount is not numeric, or a push payload is not an array
    #[error("invalid value: {reason}")]
    InvalidValue {
        /// Why the value was rejected
        reason: String,
    },

    /// Key not present in the document
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key
        key: String,
    },

    /// Existing value has the wrong kind for the operation
    #[error("type mismatch for key '{key}': expected {expected}, got {}", describe_kind(.actual))]
    TypeMismatch {
        /// Key whose value was inspected
        key: String,
        /// Kind the operation requires
        expected: ValueKind,
        /// Kind actually stored (`None` when the key is absent)
        actual: Option<ValueKind>,
    },

    /// Backing or snapshot file is not a JSON object
    #[error("corrupt document at {}: {reason}", .path.display())]
    CorruptDocument {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// I/O error (read, write, rename, fsync)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot file already exists
    #[error("backup already exists: {}", .path.display())]
    BackupExists {
        /// Snapshot path that was not overwritten
        path: PathBuf,
    },

    /// Snapshot file to restore from does not exist
    #[error("backup not found: {}", .path.display())]
    BackupNotFound {
        /// Snapshot path that was looked up
        path: PathBuf,
    },

    /// Lock acquisition exceeded the configured timeout
    #[error("timed out after {}ms waiting for {operation} lock", .waited.as_millis())]
    Timeout {
        /// `"read"` or `"write"`
        operation: &'static str,
        /// How long the caller waited
        waited: Duration,
    },

    /// Configuration file could not be read or parsed
    #[error("config error: {reason}")]
    Config {
        /// Why the configuration was rejected
        reason: String,
    },
}

fn describe_kind(kind: &Option<ValueKind>) -> &'static str {
    match kind {
        Some(kind) => kind.as_str(),
        None => "nothing",
    }
}

impl Error {
    /// Create an InvalidKey error
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Error::InvalidKey {
            reason: reason.into(),
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Create a KeyNotFound error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound { key: key.into() }
    }

    /// Create a TypeMismatch error
    pub fn type_mismatch(
        key: impl Into<String>,
        expected: ValueKind,
        actual: Option<ValueKind>,
    ) -> Self {
        Error::TypeMismatch {
            key: key.into(),
            expected,
            actual,
        }
    }

    /// Create a CorruptDocument error
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::CorruptDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// The backing store itself is unhealthy or misconfigured
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::CorruptDocument { .. } | Error::Io(_) | Error::Config { .. })
    }

    /// Retrying later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
