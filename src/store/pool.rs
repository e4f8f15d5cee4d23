//! Fixed-size pool of SQLite connections
//!
//! Every connection points at the same database file and sits behind its
//! own mutex. Callers block in [`ConnectionPool::acquire`] until a permit
//! is free or the acquire timeout elapses; the connection goes back to the
//! pool when the guard is dropped.

use std::ops::Deref;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use rusqlite::{Connection, OpenFlags};

use super::{StoreConfig, StoreError, StoreResult};

/// Pool of read-write SQLite connections
pub struct ConnectionPool {
    connections: Vec<Mutex<Connection>>,
    /// Connections not handed out; a caller holding a permit is
    /// guaranteed an unlocked slot
    available: Mutex<usize>,
    released: Condvar,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    /// Open `config.pool_size` connections to `config.path`
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let size = config.pool_size.max(1);
        let mut connections = Vec::with_capacity(size);

        for _ in 0..size {
            let conn = Connection::open_with_flags(
                &config.path,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            configure_connection(&conn, config)?;
            connections.push(Mutex::new(conn));
        }

        Ok(Self {
            connections,
            available: Mutex::new(size),
            released: Condvar::new(),
            acquire_timeout: config.acquire_timeout,
        })
    }

    /// Acquire a pooled connection
    ///
    /// Waits up to the configured timeout for a connection to become available.
    pub fn acquire(&self) -> StoreResult<PooledConnection<'_>> {
        let deadline = Instant::now() + self.acquire_timeout;
        let mut available = self.available.lock();

        while *available == 0 {
            if self.released.wait_until(&mut available, deadline).timed_out() && *available == 0 {
                return Err(StoreError::PoolTimeout(self.acquire_timeout));
            }
        }
        *available -= 1;
        drop(available);

        let permit = Permit { pool: self };
        for slot in &self.connections {
            if let Some(conn) = slot.try_lock() {
                return Ok(PooledConnection {
                    conn,
                    _permit: permit,
                });
            }
        }

        Err(StoreError::PoolInconsistent)
    }

    /// Number of connections currently not handed out
    pub fn idle_count(&self) -> usize {
        *self.available.lock()
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }
}

/// Apply per-connection pragmas
fn configure_connection(conn: &Connection, config: &StoreConfig) -> StoreResult<()> {
    conn.busy_timeout(config.busy_timeout)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

/// Returns one unit of availability to the pool when dropped
struct Permit<'a> {
    pool: &'a ConnectionPool,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        *self.pool.available.lock() += 1;
        self.pool.released.notify_one();
    }
}

/// A connection checked out of a [`ConnectionPool`]
///
/// Fields drop in order: the slot is unlocked before the permit wakes a
/// waiter.
pub struct PooledConnection<'a> {
    conn: MutexGuard<'a, Connection>,
    _permit: Permit<'a>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}
