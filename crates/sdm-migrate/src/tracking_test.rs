//! Tests for the tracking table store.

use super::*;
use chrono::NaiveDate;
use sdm_db::DuckDbBackend;

// ── Helpers ────────────────────────────────────────────────────────────

fn table(name: &str) -> TableName {
    TableName::parse(name).unwrap()
}

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

// ── Creation ───────────────────────────────────────────────────────────

#[test]
fn ensure_exists_creates_once() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));

    assert!(store.ensure_exists().unwrap());
    assert!(!store.ensure_exists().unwrap());
    assert!(!db.is_active());
    assert!(store.records().unwrap().is_empty());
}

#[test]
fn ensure_exists_keeps_existing_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute(
        "CREATE TABLE db_upgrade (id INTEGER NOT NULL, apply_date TIMESTAMP NOT NULL, name VARCHAR(255), PRIMARY KEY (apply_date))",
        &[],
    )
    .unwrap();
    db.execute(
        "INSERT INTO db_upgrade VALUES (7, TIMESTAMP '2020-01-01 00:00:00', 'legacy.sql')",
        &[],
    )
    .unwrap();

    let store = TrackingStore::new(&db, table("db_upgrade"));
    assert!(!store.ensure_exists().unwrap());
    assert_eq!(store.highest_id().unwrap(), 7);
    assert!(store.exists("legacy.sql").unwrap());
}

#[test]
fn schema_qualified_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE SCHEMA meta", &[]).unwrap();
    let store = TrackingStore::new(&db, table("meta.history"));

    assert!(store.ensure_exists().unwrap());
    store.insert(1, "001.sql", at(1)).unwrap();
    assert!(store.exists("001.sql").unwrap());
}

// ── Queries ────────────────────────────────────────────────────────────

#[test]
fn highest_id_is_zero_when_empty() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));
    store.ensure_exists().unwrap();
    assert_eq!(store.highest_id().unwrap(), 0);
}

#[test]
fn highest_id_ignores_insertion_order() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));
    store.ensure_exists().unwrap();
    store.insert(5, "b.sql", at(1)).unwrap();
    store.insert(12, "c.sql", at(2)).unwrap();
    store.insert(3, "a.sql", at(3)).unwrap();
    assert_eq!(store.highest_id().unwrap(), 12);
}

#[test]
fn exists_matches_exact_name() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));
    store.ensure_exists().unwrap();
    store.insert(1, "001_init.sql", at(1)).unwrap();

    assert!(store.exists("001_init.sql").unwrap());
    assert!(!store.exists("001_INIT.sql").unwrap());
    assert!(!store.exists("001_init").unwrap());
}

#[test]
fn records_ordered_by_id() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));
    store.ensure_exists().unwrap();
    store.insert(2, "b.sql", at(2)).unwrap();
    store.insert(1, "a.sql", at(1)).unwrap();

    let records = store.records().unwrap();
    assert_eq!(
        records,
        vec![
            TrackingRecord {
                id: 1,
                apply_date: at(1),
                name: Some("a.sql".to_string()),
            },
            TrackingRecord {
                id: 2,
                apply_date: at(2),
                name: Some("b.sql".to_string()),
            },
        ]
    );
}

// ── Constraints ────────────────────────────────────────────────────────

#[test]
fn same_timestamp_allowed() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));
    store.ensure_exists().unwrap();
    store.insert(1, "a.sql", at(1)).unwrap();
    store.insert(2, "b.sql", at(1)).unwrap();
    assert_eq!(store.records().unwrap().len(), 2);
}

#[test]
fn duplicate_name_rejected() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));
    store.ensure_exists().unwrap();
    store.insert(1, "a.sql", at(1)).unwrap();

    let err = store.insert(2, "a.sql", at(2)).unwrap_err();
    assert!(matches!(err, MigrateError::Tracking { .. }));
}

#[test]
fn queries_fail_without_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let store = TrackingStore::new(&db, table("db_upgrade"));
    assert!(matches!(
        store.highest_id().unwrap_err(),
        MigrateError::Tracking { .. }
    ));
}
