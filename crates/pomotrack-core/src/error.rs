//! Core error types for pomotrack-core.
//!
//! The timer state machine itself never fails. Errors come from the
//! settings validation gate, the persistence store, the TOML config file,
//! and the platform collaborators (which the controller always swallows).

use std::path::PathBuf;
use thiserror::Error;

/// Persistence store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored value could not be decoded
    #[error("Corrupt value under '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the config tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Settings validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A duration or cycle field is below its minimum
    #[error("{field} must be at least {min} (got {value})")]
    BelowMinimum {
        field: &'static str,
        value: u32,
        min: u32,
    },

    /// A field exceeds its maximum
    #[error("{field} must be at most {max} (got {value})")]
    AboveMaximum {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// Failure reported by a platform collaborator (notifications, haptics,
/// wake-lock, ticker). Never propagated out of the controller.
#[derive(Error, Debug, Clone)]
#[error("{service} failed: {message}")]
pub struct CollaboratorError {
    pub service: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field_and_bounds() {
        let err = ValidationError::AboveMaximum {
            field: "sessions_until_long_break",
            value: 11,
            max: 10,
        };
        assert_eq!(
            err.to_string(),
            "sessions_until_long_break must be at most 10 (got 11)"
        );
    }

    #[test]
    fn no_rows_maps_to_query_failed() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }

    #[test]
    fn locked_database_has_readable_message() {
        assert_eq!(StoreError::Locked.to_string(), "Database is locked");
    }
}
