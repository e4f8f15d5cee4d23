//! Immutable version records

use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::error::{ArticleError, ArticleResult};
use crate::store::{articles, versions, StoreError, StoreResult, WriteTxn};
use crate::types::ArticleVersion;

/// Creates and reads article versions
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionStore;

impl VersionStore {
    /// Snapshot the article row as it currently stands inside `tx`
    ///
    /// The snapshot is read back from the transaction, never taken from
    /// caller input, so it always reflects the post-mutation state.
    pub fn create_version(
        &self,
        tx: &WriteTxn<'_>,
        article_id: Uuid,
        version_number: i64,
    ) -> StoreResult<ArticleVersion> {
        let article = articles::find_article(tx, article_id)?.ok_or_else(|| {
            StoreError::Corrupt(format!("article {} missing inside its own transaction", article_id))
        })?;

        let version = ArticleVersion::snapshot(&article, version_number, Utc::now());
        versions::insert_version(tx, &version)?;
        Ok(version)
    }

    /// All versions of an article, highest number first
    pub fn list_versions(&self, conn: &Connection, article_id: Uuid) -> StoreResult<Vec<ArticleVersion>> {
        versions::list_versions(conn, article_id)
    }

    pub fn get_version(
        &self,
        conn: &Connection,
        article_id: Uuid,
        version_number: i64,
    ) -> ArticleResult<ArticleVersion> {
        versions::find_version(conn, article_id, version_number)?
            .ok_or_else(|| ArticleError::not_found("Article version"))
    }
}
