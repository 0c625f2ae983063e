//! sdm-db - Database capability for sdm
//!
//! This crate provides the `Database` trait the migration engine drives
//! (transaction control plus parameterised statement execution) and its
//! DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Row};
pub use value::SqlValue;
