//! Scoped transaction handle.

use sdm_db::{Database, DbResult};

/// Transaction opened on a [`Database`] for the lifetime of this value.
///
/// Dropping the scope without committing rolls the transaction back only if
/// the connection marked it rollback-only. Otherwise the uncommitted work is
/// left to the connection's owner.
pub(crate) struct TransactionScope<'a> {
    db: &'a dyn Database,
}

impl<'a> TransactionScope<'a> {
    pub(crate) fn begin(db: &'a dyn Database) -> DbResult<Self> {
        db.begin_transaction()?;
        Ok(Self { db })
    }

    pub(crate) fn commit(self) -> DbResult<()> {
        self.db.commit()
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if self.db.is_active() && self.db.is_rollback_only() {
            log::debug!("Rolling back transaction marked rollback-only");
            if let Err(e) = self.db.rollback() {
                log::error!("Rollback failed: {e}");
            }
        }
    }
}
