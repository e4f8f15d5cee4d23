//! Write transaction guard

use std::ops::Deref;

use rusqlite::Connection;
use tracing::warn;

use super::{PooledConnection, StoreResult};

/// A `BEGIN IMMEDIATE` transaction on a pooled connection
///
/// Rolls back on drop unless [`WriteTxn::commit`] succeeded.
pub struct WriteTxn<'a> {
    conn: PooledConnection<'a>,
    open: bool,
}

impl<'a> WriteTxn<'a> {
    pub(crate) fn begin(conn: PooledConnection<'a>) -> StoreResult<Self> {
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(Self { conn, open: true })
    }

    /// Commit; on failure the transaction is rolled back before returning
    pub fn commit(mut self) -> StoreResult<()> {
        match self.conn.execute_batch("COMMIT") {
            Ok(()) => {
                self.open = false;
                Ok(())
            }
            Err(e) => {
                self.rollback_quietly();
                Err(e.into())
            }
        }
    }

    pub fn rollback(mut self) -> StoreResult<()> {
        self.open = false;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn rollback_quietly(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                warn!(error = %e, "rollback failed");
            }
        }
    }
}

impl Deref for WriteTxn<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for WriteTxn<'_> {
    fn drop(&mut self) {
        self.rollback_quietly();
    }
}
