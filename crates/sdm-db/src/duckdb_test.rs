use super::*;
use chrono::NaiveDate;

fn count(db: &DuckDbBackend, table: &str) -> i64 {
    db.query(&format!("SELECT COUNT(*) FROM {table}"), &[])
        .unwrap()[0][0]
        .as_i64()
        .unwrap()
}

#[test]
fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert!(!db.is_active());
}

#[test]
fn test_new_memory_special_case() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    db.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();
    assert_eq!(count(&db, "t"), 0);
}

#[test]
fn test_from_path_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();
        db.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
    }
    let db = DuckDbBackend::from_path(&path).unwrap();
    assert_eq!(count(&db, "t"), 1);
}

#[test]
fn test_parameterised_insert_and_query() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute(
        "CREATE TABLE t (id INTEGER NOT NULL, applied TIMESTAMP NOT NULL, name VARCHAR(255))",
        &[],
    )
    .unwrap();

    let ts = NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_micro_opt(7, 8, 9, 123_456)
        .unwrap();
    let affected = db
        .execute(
            "INSERT INTO t (id, applied, name) VALUES (?, ?, ?)",
            &[SqlValue::Integer(3), SqlValue::Timestamp(ts), SqlValue::from("001.sql")],
        )
        .unwrap();
    assert_eq!(affected, 1);

    let rows = db
        .query(
            "SELECT id, applied, name FROM t WHERE name = ?",
            &[SqlValue::from("001.sql")],
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], SqlValue::Integer(3));
    assert_eq!(rows[0][1], SqlValue::Timestamp(ts));
    assert_eq!(rows[0][2], SqlValue::Text("001.sql".to_string()));
}

#[test]
fn test_query_missing_table_is_table_not_found() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.query("SELECT COUNT(*) FROM nonexistent", &[]).unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)), "got {err}");
}

#[test]
fn test_commit_makes_changes_visible() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();

    db.begin_transaction().unwrap();
    assert!(db.is_active());
    db.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
    db.commit().unwrap();

    assert!(!db.is_active());
    assert_eq!(count(&db, "t"), 1);
}

#[test]
fn test_rollback_discards_changes() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE t (id INTEGER)", &[]).unwrap();

    db.begin_transaction().unwrap();
    db.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
    db.rollback().unwrap();

    assert!(!db.is_active());
    assert_eq!(count(&db, "t"), 0);
}

#[test]
fn test_failure_marks_rollback_only() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.begin_transaction().unwrap();
    assert!(!db.is_rollback_only());

    assert!(db.execute("THIS IS NOT SQL", &[]).is_err());
    assert!(db.is_rollback_only());

    let err = db.commit().unwrap_err();
    assert!(matches!(err, DbError::TransactionError(_)));
    db.rollback().unwrap();
    assert!(!db.is_active());
    assert!(!db.is_rollback_only());
}

#[test]
fn test_failure_outside_transaction_does_not_mark() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(db.execute("THIS IS NOT SQL", &[]).is_err());
    assert!(!db.is_rollback_only());
    db.set_rollback_only();
    assert!(!db.is_rollback_only());
}

#[test]
fn test_nested_begin_rejected() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.begin_transaction().unwrap();
    assert!(matches!(
        db.begin_transaction().unwrap_err(),
        DbError::TransactionError(_)
    ));
    db.rollback().unwrap();
}

#[test]
fn test_commit_without_transaction() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(db.commit().is_err());
    db.rollback().unwrap();
}
