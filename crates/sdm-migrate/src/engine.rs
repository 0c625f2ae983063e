//! Transactional apply of pending migrations.
//!
//! A run proceeds as:
//!
//! 1. claim the [`RunGuard`] (a second run in the process fails here, before
//!    any I/O)
//! 2. make sure the tracking table exists
//! 3. discover the catalog, sorted by name
//! 4. open one transaction for the whole run
//! 5. for each unit not yet recorded: split, execute every statement in
//!    order, then record it with the next id
//! 6. commit
//!
//! All pending migrations commit together. A failure part-way discards the
//! work of every migration attempted in the run, not only the failing one.

use crate::error::{MigrateError, MigrateResult};
use crate::guard::RunGuard;
use crate::tracking::TrackingStore;
use crate::transaction::TransactionScope;
use chrono::Utc;
use sdm_core::{tracking_table, MigrationCatalog, MigrationName, ResourceLoader, TableName};
use sdm_db::Database;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Units applied by this run, in apply order.
    pub applied: Vec<MigrationName>,
    /// Units already recorded in the tracking table.
    pub skipped: Vec<MigrationName>,
}

impl MigrationReport {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// Migration engine bound to a run guard and a tracking table.
pub struct Migrator<'g> {
    guard: &'g RunGuard,
    table: TableName,
}

impl Migrator<'static> {
    /// Engine using the process-wide guard.
    pub fn new(table: TableName) -> Self {
        Self::with_guard(RunGuard::global(), table)
    }
}

impl<'g> Migrator<'g> {
    /// Engine using a caller-owned guard.
    pub fn with_guard(guard: &'g RunGuard, table: TableName) -> Self {
        Self { guard, table }
    }

    /// Apply the `.sql` files of `folder`.
    pub fn run_folder(&self, db: &dyn Database, folder: &Path) -> MigrateResult<MigrationReport> {
        self.guarded(|| {
            let catalog = MigrationCatalog::from_folder(folder).map_err(MigrateError::Discovery)?;
            self.apply(db, &catalog)
        })
    }

    /// Apply the units listed by the manifest at `manifest_path`.
    pub fn run_resources(
        &self,
        db: &dyn Database,
        loader: Arc<dyn ResourceLoader>,
        manifest_path: &str,
    ) -> MigrateResult<MigrationReport> {
        self.guarded(|| {
            let catalog = MigrationCatalog::from_resources(loader, manifest_path)
                .map_err(MigrateError::Discovery)?;
            self.apply(db, &catalog)
        })
    }

    /// Apply an already discovered catalog.
    pub fn run(
        &self,
        db: &dyn Database,
        catalog: &MigrationCatalog,
    ) -> MigrateResult<MigrationReport> {
        self.guarded(|| self.apply(db, catalog))
    }

    fn guarded<F>(&self, body: F) -> MigrateResult<MigrationReport>
    where
        F: FnOnce() -> MigrateResult<MigrationReport>,
    {
        self.guard.acquire()?;
        let result = body();
        if let Err(e) = &result {
            log::error!("Error applying migrations: {e}");
        }
        self.guard.finish(result.is_ok());
        result
    }

    fn apply(
        &self,
        db: &dyn Database,
        catalog: &MigrationCatalog,
    ) -> MigrateResult<MigrationReport> {
        let store = TrackingStore::new(db, self.table.clone());
        store.ensure_exists()?;

        let tx = TransactionScope::begin(db).map_err(MigrateError::Transaction)?;
        let mut next_id = store.highest_id()? + 1;
        let mut report = MigrationReport::default();

        for unit in catalog {
            let name = unit.name();
            if store.exists(name)? {
                log::debug!("Skipping applied migration: {name}");
                report.skipped.push(name.clone());
                continue;
            }

            log::warn!("Applying migration: {name}");
            let statements = unit.statements().map_err(|source| MigrateError::Io {
                name: name.to_string(),
                source,
            })?;
            for sql in &statements {
                log::debug!("Migration query: {sql}");
                db.execute(sql, &[]).map_err(|source| {
                    db.set_rollback_only();
                    MigrateError::Execution {
                        name: name.to_string(),
                        source,
                    }
                })?;
            }

            store.insert(next_id, name, Utc::now().naive_utc())?;
            next_id += 1;
            report.applied.push(name.clone());
        }

        tx.commit().map_err(MigrateError::Transaction)?;
        log::info!("Applied {} migrations", report.applied_count());
        Ok(report)
    }
}

/// Apply the migrations in `folder` using the process-wide tracking table.
pub fn migrate(db: &dyn Database, folder: &Path) -> MigrateResult<MigrationReport> {
    let table = tracking_table().map_err(MigrateError::Config)?;
    Migrator::new(table.clone()).run_folder(db, folder)
}

/// Apply the migrations in `folder`, recording them in `table`.
pub fn migrate_with_table(
    db: &dyn Database,
    table: &str,
    folder: &Path,
) -> MigrateResult<MigrationReport> {
    let table = TableName::parse(table).map_err(MigrateError::Config)?;
    Migrator::new(table).run_folder(db, folder)
}

/// Apply the migrations listed by the resource manifest at `manifest_path`.
pub fn migrate_from_resources(
    db: &dyn Database,
    loader: Arc<dyn ResourceLoader>,
    manifest_path: &str,
) -> MigrateResult<MigrationReport> {
    let table = tracking_table().map_err(MigrateError::Config)?;
    Migrator::new(table.clone()).run_resources(db, loader, manifest_path)
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
