//! Status command implementation

use anyhow::{Context, Result};
use sdm_core::MigrationCatalog;
use sdm_migrate::{TrackingRecord, TrackingStore};
use serde::Serialize;
use std::collections::HashMap;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{open_database, tracking_table, Source};

/// Whether a migration has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MigrationStatus {
    Applied,
    Pending,
    /// Recorded in the tracking table but absent from the source.
    Missing,
}

/// One line of status output.
#[derive(Debug, Serialize)]
pub(crate) struct StatusEntry {
    pub name: String,
    pub status: MigrationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_date: Option<String>,
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let source = Source::from_args(&args.source)?;
    let catalog = source.catalog()?;
    let table = tracking_table(global)?;
    let db = open_database(global)?;

    let store = TrackingStore::new(&db, table.clone());
    let records = match store.records() {
        Ok(records) => records,
        Err(e) => {
            if global.verbose {
                eprintln!("[verbose] No readable tracking table {table}: {e}");
            }
            Vec::new()
        }
    };

    let entries = build_entries(&catalog, records);

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&entries)
                .context("Failed to serialize status")?;
            println!("{json}");
        }
        OutputFormat::Text => print_text(&entries),
    }
    Ok(())
}

/// Pair catalog units with tracking records, in apply order.
///
/// Records whose names match no unit are appended as `Missing`.
pub(crate) fn build_entries(
    catalog: &MigrationCatalog,
    records: Vec<TrackingRecord>,
) -> Vec<StatusEntry> {
    let mut by_name: HashMap<String, TrackingRecord> = HashMap::new();
    let mut unnamed = Vec::new();
    for record in records {
        match record.name.clone() {
            Some(name) => {
                by_name.insert(name, record);
            }
            None => unnamed.push(record),
        }
    }

    let mut entries: Vec<StatusEntry> = catalog
        .iter()
        .map(|unit| match by_name.remove(unit.name().as_str()) {
            Some(record) => entry(
                unit.name().to_string(),
                MigrationStatus::Applied,
                Some(&record),
            ),
            None => entry(unit.name().to_string(), MigrationStatus::Pending, None),
        })
        .collect();

    let mut missing: Vec<TrackingRecord> = by_name.into_values().chain(unnamed).collect();
    missing.sort_by_key(|r| r.id);
    entries.extend(missing.iter().map(|record| {
        entry(
            record.name.clone().unwrap_or_default(),
            MigrationStatus::Missing,
            Some(record),
        )
    }));
    entries
}

fn entry(name: String, status: MigrationStatus, record: Option<&TrackingRecord>) -> StatusEntry {
    StatusEntry {
        name,
        status,
        id: record.map(|r| r.id),
        apply_date: record.map(|r| r.apply_date.format("%Y-%m-%d %H:%M:%S").to_string()),
    }
}

fn print_text(entries: &[StatusEntry]) {
    if entries.is_empty() {
        println!("No migrations found");
        return;
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for e in entries {
        let status = match e.status {
            MigrationStatus::Applied => "applied",
            MigrationStatus::Pending => "pending",
            MigrationStatus::Missing => "missing",
        };
        match (&e.id, &e.apply_date) {
            (Some(id), Some(date)) => {
                println!("  {:<width$}  {status:<7}  #{id} at {date}", e.name)
            }
            _ => println!("  {:<width$}  {status}", e.name),
        }
    }

    let pending = entries
        .iter()
        .filter(|e| e.status == MigrationStatus::Pending)
        .count();
    println!();
    println!("{} migration(s), {pending} pending", entries.len());
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
