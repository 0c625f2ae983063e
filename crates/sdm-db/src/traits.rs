//! Database capability trait

use crate::error::DbResult;
use crate::value::SqlValue;

/// One result row, in select-list order.
pub type Row = Vec<SqlValue>;

/// Connection capability driven by the migration engine.
///
/// At most one transaction is open at a time. A statement that fails while a
/// transaction is active marks that transaction rollback-only; the owner of
/// the transaction decides when to roll it back.
pub trait Database: Send + Sync {
    /// Open a transaction. Fails if one is already active.
    fn begin_transaction(&self) -> DbResult<()>;

    /// Commit the active transaction.
    fn commit(&self) -> DbResult<()>;

    /// Roll back the active transaction. A no-op when none is active.
    fn rollback(&self) -> DbResult<()>;

    /// Whether a transaction is currently open.
    fn is_active(&self) -> bool;

    /// Whether the open transaction can only be rolled back.
    fn is_rollback_only(&self) -> bool;

    /// Mark the open transaction rollback-only.
    fn set_rollback_only(&self);

    /// Execute a statement, returning the number of affected rows.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Run a query and collect every row.
    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
