//! Strongly-typed migration unit name.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Identity of a migration unit, e.g. `001_create_users.sql`.
///
/// The name is the idempotency key in the tracking table and the sole input
/// to apply ordering. Ordering is plain lexicographic string ordering, so
/// `10_b.sql` sorts before `2_c.sql`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationName(String);

impl MigrationName {
    /// Try to create a new `MigrationName`, returning `None` if the name is empty.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MigrationName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        assert!(MigrationName::try_new("").is_none());
        assert!(MigrationName::try_new("001.sql").is_some());
    }

    #[test]
    fn test_lexicographic_ordering() {
        let mut names: Vec<MigrationName> = ["2.sql", "10.sql", "1.sql", "10_b.sql"]
            .into_iter()
            .filter_map(MigrationName::try_new)
            .collect();
        names.sort();
        let sorted: Vec<&str> = names.iter().map(MigrationName::as_str).collect();
        // Byte order: '.' < '0' < '_'.
        assert_eq!(sorted, vec!["1.sql", "10.sql", "10_b.sql", "2.sql"]);
    }

    #[test]
    fn test_borrow_lookup() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(MigrationName::try_new("001.sql").unwrap());
        assert!(set.contains("001.sql"));
    }
}
