//! Error types for sdm-migrate

use sdm_core::CoreError;
use sdm_db::DbError;
use thiserror::Error;

/// Migration run errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A run already happened in this process (M001)
    #[error("[M001] Migrations already run in this process")]
    AlreadyRun,

    /// Reading a migration unit failed (M002)
    #[error("[M002] Failed to read migration {name}")]
    Io {
        name: String,
        #[source]
        source: CoreError,
    },

    /// A migration statement failed to execute (M003)
    #[error("[M003] Migration {name} failed")]
    Execution {
        name: String,
        #[source]
        source: DbError,
    },

    /// A tracking table query failed (M004)
    #[error("[M004] Tracking table {table} operation failed")]
    Tracking {
        table: String,
        #[source]
        source: DbError,
    },

    /// Transaction control failed (M005)
    #[error("[M005] Migration transaction failed")]
    Transaction(#[source] DbError),

    /// Migration units could not be discovered (M006)
    #[error("[M006] Failed to discover migrations")]
    Discovery(#[source] CoreError),

    /// Tracking table configuration is invalid (M007)
    #[error("[M007] Invalid migration configuration")]
    Config(#[source] CoreError),

    /// Run guard lock poisoned (M008)
    #[error("[M008] Run guard lock poisoned")]
    GuardPoisoned,
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
