//! sdm-migrate - Migration engine for sdm
//!
//! Applies the pending migrations of a catalog against a [`Database`] in one
//! transaction, recording each applied unit in the tracking table so it is
//! never applied twice. A process-wide [`RunGuard`] allows a single run per
//! process.
//!
//! [`Database`]: sdm_db::Database

pub mod engine;
pub mod error;
pub mod guard;
pub mod tracking;
mod transaction;

pub use engine::{migrate, migrate_from_resources, migrate_with_table, MigrationReport, Migrator};
pub use error::{MigrateError, MigrateResult};
pub use guard::{RunGuard, RunState};
pub use tracking::{TrackingRecord, TrackingStore};
