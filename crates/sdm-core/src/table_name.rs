//! Validated tracking-table name.

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::quote_qualified;
use std::fmt;
use std::ops::Deref;

/// Name of the bookkeeping table, optionally schema-qualified (`schema.table`).
///
/// Each dot-separated part must be a plain identifier
/// (`[A-Za-z_][A-Za-z0-9_]*`), since the name is spliced into DDL and DML.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Validate and wrap a table name.
    pub fn parse(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::InvalidTableName {
                name,
                reason: "name is empty".to_string(),
            });
        }
        for part in name.split('.') {
            if let Some(reason) = invalid_identifier_reason(part) {
                return Err(CoreError::InvalidTableName { name, reason });
            }
        }
        Ok(Self(name))
    }

    /// Return the name as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the name quoted for use inside SQL text.
    pub fn quoted(&self) -> String {
        quote_qualified(&self.0)
    }
}

fn invalid_identifier_reason(part: &str) -> Option<String> {
    let mut chars = part.chars();
    match chars.next() {
        None => Some("empty name component".to_string()),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            Some(format!("'{part}' must start with a letter or underscore"))
        }
        Some(_) => chars
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
            .map(|c| format!("'{part}' contains invalid character '{c}'")),
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for TableName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
