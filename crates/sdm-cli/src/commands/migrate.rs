//! Migrate command implementation

use anyhow::{Context, Result};
use sdm_db::{Database, DuckDbBackend};
use sdm_migrate::{MigrationReport, Migrator};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{open_database, tracking_table, Source};

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let source = Source::from_args(&args.source)?;
    let table = tracking_table(global)?;
    let db = open_database(global)?;

    println!("Migrating from {}", source.describe());

    let report = apply(&Migrator::new(table), &db, &source, global.verbose)?;

    for name in &report.applied {
        println!("  Applied: {name}");
    }
    if global.verbose {
        for name in &report.skipped {
            eprintln!("[verbose] Already applied: {name}");
        }
    }

    println!();
    println!(
        "Applied {} migration{}, {} already applied",
        report.applied_count(),
        if report.applied_count() == 1 { "" } else { "s" },
        report.skipped.len()
    );
    Ok(())
}

/// Run `migrator` over `source`, discarding uncommitted work on failure.
pub(crate) fn apply(
    migrator: &Migrator<'_>,
    db: &DuckDbBackend,
    source: &Source<'_>,
    verbose: bool,
) -> Result<MigrationReport> {
    let result = match source {
        Source::Folder(dir) => migrator.run_folder(db, dir),
        Source::Resources { loader, manifest } => {
            migrator.run_resources(db, loader.clone(), manifest)
        }
    };

    match result {
        Ok(report) => Ok(report),
        Err(err) => {
            if db.is_active() {
                if verbose {
                    eprintln!("[verbose] Rolling back uncommitted migration work");
                }
                db.rollback().context("Rollback after failed run")?;
            }
            Err(err).context("Migration run failed")
        }
    }
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
