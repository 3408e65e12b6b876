//! Core error types for goalpath-core.
//!
//! This module defines the error hierarchy using thiserror. Scheduling
//! evaluation itself never errors on malformed item data (such items
//! simply fall out of scope); the variants here surface from persistence,
//! configuration, and explicit validation paths.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for goalpath-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Schedule state errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to prepare the data directory
    #[error("Failed to prepare data directory: {0}")]
    DataDir(#[from] std::io::Error),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Errors for items whose stored fields are inconsistent with their kind.
///
/// Recurrence evaluation treats such items as never-occurring rather than
/// failing; these variants surface only from explicit validation.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A habit is missing its anchor start date
    #[error("Habit '{item_id}' has no start date")]
    MissingStartDate { item_id: String },

    /// A habit is missing its recurrence kind
    #[error("Habit '{item_id}' has no recurrence kind")]
    MissingRecurrence { item_id: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Category title collides (case-insensitively) with an existing one
    #[error("A category titled '{title}' already exists")]
    DuplicateCategoryTitle { title: String },

    /// Milestone fraction must be a multiple of 25 in [25, 100]
    #[error("Invalid milestone fraction {value}: must be a multiple of 25 in [25, 100]")]
    InvalidFraction { value: f64 },

    /// Operation requires an unattached inbox item
    #[error("Item '{id}' is not an inbox item")]
    NotAnInboxItem { id: String },
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
