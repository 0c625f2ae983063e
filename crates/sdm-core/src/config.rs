//! Tracking table configuration.
//!
//! The bookkeeping table name is resolved once per process with the priority
//! explicit override > `SDM_OWN_TABLE` environment variable > `db_upgrade`.

use crate::error::CoreResult;
use crate::table_name::TableName;
use std::sync::OnceLock;

/// Tracking table used when nothing overrides it.
pub const DEFAULT_TRACKING_TABLE: &str = "db_upgrade";

/// Environment variable overriding the tracking table name.
pub const TRACKING_TABLE_ENV: &str = "SDM_OWN_TABLE";

static TRACKING_TABLE: OnceLock<TableName> = OnceLock::new();

/// Resolve the tracking table name without caching it.
///
/// Priority: `override_name` > `SDM_OWN_TABLE` > [`DEFAULT_TRACKING_TABLE`]
pub fn resolve_tracking_table(override_name: Option<&str>) -> CoreResult<TableName> {
    if let Some(name) = override_name {
        log::info!("Using tracking table from override: {name}");
        return TableName::parse(name);
    }
    match std::env::var(TRACKING_TABLE_ENV) {
        Ok(name) => {
            log::info!("Using tracking table from environment variable {TRACKING_TABLE_ENV}: {name}");
            TableName::parse(name)
        }
        Err(_) => TableName::parse(DEFAULT_TRACKING_TABLE),
    }
}

/// Resolve and pin the process-wide tracking table name.
///
/// Only the first successful call resolves; later calls return the pinned
/// name and ignore `override_name`.
pub fn init_tracking_table(override_name: Option<&str>) -> CoreResult<&'static TableName> {
    if let Some(table) = TRACKING_TABLE.get() {
        return Ok(table);
    }
    let table = resolve_tracking_table(override_name)?;
    Ok(TRACKING_TABLE.get_or_init(|| table))
}

/// The process-wide tracking table name, resolving it on first use.
pub fn tracking_table() -> CoreResult<&'static TableName> {
    init_tracking_table(None)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
