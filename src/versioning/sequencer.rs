//! Version number assignment

use tracing::warn;
use uuid::Uuid;

use crate::error::{ArticleError, ArticleResult};
use crate::store::{versions, StoreError, StoreResult, WriteTxn};

/// Attempts made before a collision surfaces as [`ArticleError::Conflict`]
pub const MAX_VERSION_ATTEMPTS: u32 = 3;

/// Computes the next version number of an article
///
/// Only usable inside a [`WriteTxn`]: the transaction holds the database
/// write lock from `BEGIN IMMEDIATE` until commit, so the max read here
/// cannot be observed by a concurrent writer before this transaction's
/// insert is durable.
#[derive(Debug, Clone)]
pub struct VersionSequencer {
    max_attempts: u32,
}

impl Default for VersionSequencer {
    fn default() -> Self {
        Self::new(MAX_VERSION_ATTEMPTS)
    }
}

impl VersionSequencer {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// `max(version_number) + 1`, or 1 when the article has no versions
    pub fn next_version_number(&self, tx: &WriteTxn<'_>, article_id: Uuid) -> StoreResult<i64> {
        Ok(versions::max_version_number(tx, article_id)?.map_or(1, |max| max + 1))
    }

    /// Run `insert` with the next number, re-reading the max after each
    /// unique violation
    ///
    /// Any other store error is returned immediately. Exhausting the
    /// attempts yields [`ArticleError::Conflict`].
    pub fn assign<T, F>(&self, tx: &WriteTxn<'_>, article_id: Uuid, mut insert: F) -> ArticleResult<T>
    where
        F: FnMut(i64) -> StoreResult<T>,
    {
        let mut number = self.next_version_number(tx, article_id)?;

        for attempt in 1..=self.max_attempts {
            match insert(number) {
                Ok(value) => return Ok(value),
                Err(StoreError::UniqueViolation(detail)) => {
                    warn!(
                        %article_id,
                        version = number,
                        attempt,
                        detail = %detail,
                        "version number collision"
                    );
                    if attempt < self.max_attempts {
                        number = self.next_version_number(tx, article_id)?;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ArticleError::Conflict {
            article_id,
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::{Database, StoreConfig};
    use crate::test_support::{seed_article, seed_user};
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> Database {
        Database::open(StoreConfig::new(dir.path().join("seq.db"))).unwrap()
    }

    #[test]
    fn test_first_number_is_one() {
        let dir = TempDir::new().unwrap();
        let db = open(&dir);
        let tx = db.begin_write().unwrap();

        let sequencer = VersionSequencer::default();
        assert_eq!(sequencer.next_version_number(&tx, Uuid::new_v4()).unwrap(), 1);
    }

    #[test]
    fn test_next_follows_max() {
        let dir = TempDir::new().unwrap();
        let db = open(&dir);
        let user = seed_user(&db, "seq@example.com");
        let article = seed_article(&db, user, &[1, 2, 5]);

        let tx = db.begin_write().unwrap();
        let next = VersionSequencer::default()
            .next_version_number(&tx, article)
            .unwrap();
        assert_eq!(next, 6);
    }

    #[test]
    fn test_retry_after_collision_rereads_max() {
        let dir = TempDir::new().unwrap();
        let db = open(&dir);
        let tx = db.begin_write().unwrap();
        let sequencer = VersionSequencer::default();

        let mut seen = Vec::new();
        let result = sequencer.assign(&tx, Uuid::new_v4(), |n| {
            seen.push(n);
            if seen.len() == 1 {
                Err(StoreError::UniqueViolation("stale".to_string()))
            } else {
                Ok(n)
            }
        });

        assert_eq!(result.unwrap(), 1);
        assert_eq!(seen, vec![1, 1]);
    }

    #[test]
    fn test_exhausted_retries_surface_conflict() {
        let dir = TempDir::new().unwrap();
        let db = open(&dir);
        let tx = db.begin_write().unwrap();
        let sequencer = VersionSequencer::default();

        let mut calls = 0;
        let err = sequencer
            .assign(&tx, Uuid::new_v4(), |_| -> StoreResult<()> {
                calls += 1;
                Err(StoreError::UniqueViolation("always".to_string()))
            })
            .unwrap_err();

        assert_eq!(calls, MAX_VERSION_ATTEMPTS);
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let dir = TempDir::new().unwrap();
        let db = open(&dir);
        let tx = db.begin_write().unwrap();

        let mut calls = 0;
        let err = VersionSequencer::default()
            .assign(&tx, Uuid::new_v4(), |_| -> StoreResult<()> {
                calls += 1;
                Err(StoreError::Corrupt("boom".to_string()))
            })
            .unwrap_err();

        assert_eq!(calls, 1);
        assert_eq!(err.kind(), ErrorKind::StorageFailure);
    }
}
