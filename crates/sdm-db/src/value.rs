//! Backend-neutral SQL values for parameters and result rows.

use chrono::{DateTime, NaiveDateTime};
use duckdb::types::{TimeUnit, ToSql, ToSqlOutput, Value, ValueRef};
use std::fmt;

/// Timestamp text format bound for `TIMESTAMP` parameters.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A single SQL value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Integer view of the value, if it holds one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Text view of the value, if it holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Timestamp view of the value, if it holds one.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Boolean(b) => write!(f, "{b}"),
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Double(d) => write!(f, "{d}"),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Boolean(b) => ToSqlOutput::Owned(Value::Boolean(*b)),
            SqlValue::Integer(i) => ToSqlOutput::Owned(Value::BigInt(*i)),
            SqlValue::Double(d) => ToSqlOutput::Owned(Value::Double(*d)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            // Bound as text; DuckDB casts it to the TIMESTAMP target column.
            SqlValue::Timestamp(ts) => {
                ToSqlOutput::Owned(Value::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
            }
        })
    }
}

fn micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Boolean(b) => SqlValue::Boolean(b),
            Value::TinyInt(i) => SqlValue::Integer(i.into()),
            Value::SmallInt(i) => SqlValue::Integer(i.into()),
            Value::Int(i) => SqlValue::Integer(i.into()),
            Value::BigInt(i) => SqlValue::Integer(i),
            Value::UTinyInt(i) => SqlValue::Integer(i.into()),
            Value::USmallInt(i) => SqlValue::Integer(i.into()),
            Value::UInt(i) => SqlValue::Integer(i.into()),
            Value::UBigInt(i) => match i64::try_from(i) {
                Ok(i) => SqlValue::Integer(i),
                Err(_) => SqlValue::Text(i.to_string()),
            },
            Value::HugeInt(i) => match i64::try_from(i) {
                Ok(i) => SqlValue::Integer(i),
                Err(_) => SqlValue::Text(i.to_string()),
            },
            Value::Float(f) => SqlValue::Double(f.into()),
            Value::Double(d) => SqlValue::Double(d),
            Value::Text(s) => SqlValue::Text(s),
            Value::Timestamp(unit, v) => match DateTime::from_timestamp_micros(micros(unit, v)) {
                Some(dt) => SqlValue::Timestamp(dt.naive_utc()),
                None => SqlValue::Null,
            },
            other => SqlValue::Text(format!("{other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_integer_widening() {
        assert_eq!(SqlValue::from(Value::Int(7)), SqlValue::Integer(7));
        assert_eq!(SqlValue::from(Value::UInt(7)), SqlValue::Integer(7));
        assert_eq!(
            SqlValue::from(Value::UBigInt(u64::MAX)),
            SqlValue::Text(u64::MAX.to_string())
        );
    }

    #[test]
    fn test_timestamp_units() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let secs = expected.and_utc().timestamp();
        assert_eq!(
            SqlValue::from(Value::Timestamp(TimeUnit::Second, secs)),
            SqlValue::Timestamp(expected)
        );
        assert_eq!(
            SqlValue::from(Value::Timestamp(TimeUnit::Microsecond, secs * 1_000_000)),
            SqlValue::Timestamp(expected)
        );
    }

    #[test]
    fn test_display() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(SqlValue::Timestamp(ts).to_string(), "2024-01-02 03:04:05.000000");
        assert_eq!(SqlValue::Null.to_string(), "NULL");
    }
}
