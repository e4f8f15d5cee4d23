//! Relational store for articles, versions, comments, workspaces and users
//!
//! SQLite through a fixed pool of connections to one database file.
//!
//! # Locking
//!
//! ```text
//! begin_write() ──► BEGIN IMMEDIATE ──► reads/writes ──► COMMIT
//!                   (takes the database    │             (releases lock)
//!                    write lock now)       └─ error ──► ROLLBACK
//! ```
//!
//! `BEGIN IMMEDIATE` acquires the write lock when the transaction starts,
//! not at the first write. Two transactions that both read the highest
//! version number of an article and then insert the next one can therefore
//! never interleave: the second blocks in `begin_write()` (bounded by the
//! busy timeout) until the first commits or rolls back. The lock lives in
//! the database file, so it also holds across processes.

pub mod articles;
pub mod comments;
mod pool;
mod rows;
mod schema;
mod txn;
pub mod users;
pub mod versions;
pub mod workspaces;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

pub use pool::{ConnectionPool, PooledConnection};
pub use schema::SEEDED_WORKSPACES;
pub use txn::WriteTxn;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// An insert collided with a UNIQUE or PRIMARY KEY constraint
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no pooled connection available after {0:?}")]
    PoolTimeout(Duration),

    #[error("connection pool has a free permit but no idle connection")]
    PoolInconsistent,

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &e {
            let code = failure.extended_code;
            if code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                return StoreError::UniqueViolation(detail);
            }
        }
        StoreError::Sqlite(e)
    }
}

/// Configuration for the store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
    /// Number of pooled connections
    pub pool_size: usize,
    /// How long a statement waits on the write lock before failing
    pub busy_timeout: Duration,
    /// How long `acquire` waits for a free pooled connection
    pub acquire_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/articles.db"),
            pool_size: 8,
            busy_timeout: Duration::from_millis(5000),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl StoreConfig {
    /// Create config with custom database path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Handle to the article database
pub struct Database {
    pool: ConnectionPool,
    config: StoreConfig,
}

impl Database {
    /// Open (or create) the database, apply the schema and seed workspaces
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool = ConnectionPool::open(&config)?;
        {
            let conn = pool.acquire()?;
            schema::init_schema(&conn)?;
            let seeded = schema::seed_workspaces(&conn)?;
            if seeded > 0 {
                info!(count = seeded, "seeded default workspaces");
            }
        }

        info!(
            path = %config.path.display(),
            pool_size = config.pool_size,
            "article store opened"
        );
        Ok(Self { pool, config })
    }

    /// Borrow a pooled connection for reads (autocommit)
    pub fn read(&self) -> StoreResult<PooledConnection<'_>> {
        self.pool.acquire()
    }

    /// Start a write transaction holding the database write lock
    pub fn begin_write(&self) -> StoreResult<WriteTxn<'_>> {
        let conn = self.pool.acquire()?;
        WriteTxn::begin(conn)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}
