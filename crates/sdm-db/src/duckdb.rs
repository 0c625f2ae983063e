//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Row};
use crate::value::SqlValue;
use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    active: AtomicBool,
    rollback_only: AtomicBool,
}

impl DuckDbBackend {
    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            active: AtomicBool::new(false),
            rollback_only: AtomicBool::new(false),
        }
    }

    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::with_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn connection(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn control(&self, sql: &str) -> DbResult<()> {
        self.connection()?
            .execute_batch(sql)
            .map_err(|e| DbError::TransactionError(format!("{sql} failed: {e}")))
    }

    fn clear_transaction(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.rollback_only.store(false, Ordering::SeqCst);
    }

    /// Mark the open transaction rollback-only when `result` is a failure.
    fn track_failure<T>(&self, result: DbResult<T>) -> DbResult<T> {
        if result.is_err() && self.is_active() {
            self.set_rollback_only();
        }
        result
    }

    fn execute_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let conn = self.connection()?;
        conn.execute(sql, params_from_iter(params))
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    fn query_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql).map_err(DbError::from)?;
        let mut rows = stmt.query(params_from_iter(params)).map_err(DbError::from)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(DbError::from)? {
            let width = row.as_ref().column_count();
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                let value: Value = row.get(idx).map_err(DbError::from)?;
                values.push(SqlValue::from(value));
            }
            out.push(values);
        }
        Ok(out)
    }
}

impl Database for DuckDbBackend {
    fn begin_transaction(&self) -> DbResult<()> {
        if self.is_active() {
            return Err(DbError::TransactionError(
                "a transaction is already active".to_string(),
            ));
        }
        self.control("BEGIN TRANSACTION")?;
        self.rollback_only.store(false, Ordering::SeqCst);
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn commit(&self) -> DbResult<()> {
        if !self.is_active() {
            return Err(DbError::TransactionError(
                "no active transaction to commit".to_string(),
            ));
        }
        if self.is_rollback_only() {
            return Err(DbError::TransactionError(
                "transaction is marked rollback-only".to_string(),
            ));
        }
        let result = self.control("COMMIT");
        if result.is_err() {
            let _ = self.control("ROLLBACK");
        }
        self.clear_transaction();
        result
    }

    fn rollback(&self) -> DbResult<()> {
        if !self.is_active() {
            return Ok(());
        }
        let result = self.control("ROLLBACK");
        self.clear_transaction();
        result
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn is_rollback_only(&self) -> bool {
        self.rollback_only.load(Ordering::SeqCst)
    }

    fn set_rollback_only(&self) {
        if self.is_active() {
            self.rollback_only.store(true, Ordering::SeqCst);
        }
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let result = self.execute_sync(sql, params);
        self.track_failure(result)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let result = self.query_sync(sql, params);
        self.track_failure(result)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
