//! Error types for sdm-core

use thiserror::Error;

/// Core error type for sdm
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Migrations folder not found
    #[error("[C001] Migrations folder not found: {path}")]
    FolderNotFound { path: String },

    /// C002: Failed to read a migration folder, file, or resource
    #[error("[C002] Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// C003: A manifest entry names a resource that cannot be loaded
    #[error("[C003] Migration resource not found: {path}")]
    ResourceNotFound { path: String },

    /// C004: Tracking table name is not a valid SQL identifier
    #[error("[C004] Invalid tracking table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },

    /// C005: Migration unit name is empty
    #[error("[C005] Migration name must not be empty (from {origin})")]
    EmptyMigrationName { origin: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Wrap an I/O error with the path that was being read.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}
