//! sdm-core - Core library for sdm
//!
//! This crate provides the migration building blocks shared by the engine and
//! the CLI: SQL statement splitting, migration sources (folders and embedded
//! resource manifests), catalog ordering, and tracking-table configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod migration_name;
pub mod source;
pub mod sql_utils;
pub mod statement;
pub mod table_name;

pub use catalog::MigrationCatalog;
pub use config::{init_tracking_table, resolve_tracking_table, tracking_table};
pub use error::{CoreError, CoreResult};
pub use migration_name::MigrationName;
pub use source::{DirResources, EmbeddedResources, MigrationUnit, ResourceLoader};
pub use statement::{read_sql_file, split_sql, split_sql_str, Statements};
pub use table_name::TableName;
