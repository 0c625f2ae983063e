//! Bookkeeping table recording applied migrations.
//!
//! Schema:
//!
//! ```sql
//! CREATE TABLE db_upgrade (
//!     id         INTEGER NOT NULL,
//!     apply_date TIMESTAMP NOT NULL,
//!     name       VARCHAR(255) DEFAULT NULL,
//!     PRIMARY KEY (id),
//!     UNIQUE (name)
//! )
//! ```
//!
//! The `name` column is the idempotency key. Ids are assigned by the engine,
//! continuing from the highest id already present.

use crate::error::{MigrateError, MigrateResult};
use crate::transaction::TransactionScope;
use chrono::NaiveDateTime;
use sdm_core::TableName;
use sdm_db::{Database, DbError, SqlValue};
use serde::Serialize;

const COL_ID: &str = "id";
const COL_APPLY_DATE: &str = "apply_date";
const COL_NAME: &str = "name";

/// One row of the tracking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingRecord {
    pub id: i64,
    pub apply_date: NaiveDateTime,
    pub name: Option<String>,
}

/// Access to the tracking table through a borrowed connection.
pub struct TrackingStore<'a> {
    db: &'a dyn Database,
    table: TableName,
}

impl<'a> TrackingStore<'a> {
    pub fn new(db: &'a dyn Database, table: TableName) -> Self {
        Self { db, table }
    }

    fn err(&self, source: DbError) -> MigrateError {
        MigrateError::Tracking {
            table: self.table.to_string(),
            source,
        }
    }

    /// Probe for the table and create it in its own transaction if the probe
    /// fails. Returns `true` when the table was created.
    pub fn ensure_exists(&self) -> MigrateResult<bool> {
        let probe = format!("SELECT COUNT(*) FROM {}", self.table.quoted());
        match self.db.query(&probe, &[]) {
            Ok(_) => {
                log::debug!("Tracking table {} exists", self.table);
                return Ok(false);
            }
            Err(e) => {
                log::info!("Table {} does not exist; creating ({e})", self.table);
            }
        }

        let tx = TransactionScope::begin(self.db).map_err(MigrateError::Transaction)?;
        let ddl = self.create_sql();
        log::debug!("{ddl}");
        self.db.execute(&ddl, &[]).map_err(|e| self.err(e))?;
        tx.commit().map_err(MigrateError::Transaction)?;
        Ok(true)
    }

    fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE {table} ( \
             {COL_ID} INTEGER NOT NULL, \
             {COL_APPLY_DATE} TIMESTAMP NOT NULL, \
             {COL_NAME} VARCHAR(255) DEFAULT NULL, \
             PRIMARY KEY ({COL_ID}), \
             UNIQUE ({COL_NAME}) )",
            table = self.table.quoted(),
        )
    }

    /// Highest recorded id, or 0 when the table is empty.
    pub fn highest_id(&self) -> MigrateResult<i64> {
        let sql = format!("SELECT MAX({COL_ID}) FROM {}", self.table.quoted());
        let rows = self.db.query(&sql, &[]).map_err(|e| self.err(e))?;
        Ok(rows
            .first()
            .and_then(|row| row.first())
            .and_then(SqlValue::as_i64)
            .unwrap_or(0))
    }

    /// Whether a migration with exactly this name has been recorded.
    pub fn exists(&self, name: &str) -> MigrateResult<bool> {
        let sql = format!(
            "SELECT {COL_ID} FROM {} WHERE {COL_NAME} = ?",
            self.table.quoted()
        );
        let rows = self
            .db
            .query(&sql, &[SqlValue::from(name)])
            .map_err(|e| self.err(e))?;
        Ok(!rows.is_empty())
    }

    /// Append one tracking row.
    pub fn insert(&self, id: i64, name: &str, applied_at: NaiveDateTime) -> MigrateResult<()> {
        let sql = format!(
            "INSERT INTO {} ({COL_ID}, {COL_APPLY_DATE}, {COL_NAME}) VALUES (?, ?, ?)",
            self.table.quoted()
        );
        self.db
            .execute(
                &sql,
                &[
                    SqlValue::Integer(id),
                    SqlValue::Timestamp(applied_at),
                    SqlValue::from(name),
                ],
            )
            .map_err(|e| self.err(e))?;
        Ok(())
    }

    /// All tracking rows ordered by id.
    pub fn records(&self) -> MigrateResult<Vec<TrackingRecord>> {
        let sql = format!(
            "SELECT {COL_ID}, {COL_APPLY_DATE}, {COL_NAME} FROM {} ORDER BY {COL_ID}",
            self.table.quoted()
        );
        let rows = self.db.query(&sql, &[]).map_err(|e| self.err(e))?;

        rows.into_iter()
            .map(|row| match row.as_slice() {
                [id, apply_date, name] => Ok(TrackingRecord {
                    id: id.as_i64().unwrap_or_default(),
                    apply_date: apply_date.as_timestamp().unwrap_or_default(),
                    name: name.as_str().map(str::to_string),
                }),
                other => Err(self.err(DbError::ExecutionError(format!(
                    "expected 3 columns from {}, got {}",
                    self.table,
                    other.len()
                )))),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tests;
