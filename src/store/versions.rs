//! `article_versions` table access
//!
//! Rows are insert-only. There is deliberately no update statement here.

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::rows::{attachments_at, attachments_json, opt_uuid_at, opt_uuid_text, uuid_at};
use super::StoreResult;
use crate::types::{ArticleVersion, Attachment};

const COLUMNS: &str =
    "id, article_id, version_number, title, content, attachments, workspace_id, user_id, created_at";

fn version_from_row(row: &Row<'_>) -> rusqlite::Result<ArticleVersion> {
    Ok(ArticleVersion {
        id: uuid_at(row, 0)?,
        article_id: uuid_at(row, 1)?,
        version_number: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        attachments: attachments_at(row, 5)?,
        workspace_id: opt_uuid_at(row, 6)?,
        user_id: uuid_at(row, 7)?,
        created_at: row.get(8)?,
    })
}

/// Highest version number recorded for an article, if any
pub fn max_version_number(conn: &Connection, article_id: Uuid) -> StoreResult<Option<i64>> {
    let max: Option<i64> = conn.query_row(
        "SELECT MAX(version_number) FROM article_versions WHERE article_id = ?1",
        [article_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(max)
}

/// Insert a version row
///
/// A duplicate (article_id, version_number) surfaces as
/// [`super::StoreError::UniqueViolation`].
pub fn insert_version(conn: &Connection, version: &ArticleVersion) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO article_versions
            (id, article_id, version_number, title, content, attachments, workspace_id, user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            version.id.to_string(),
            version.article_id.to_string(),
            version.version_number,
            version.title,
            version.content,
            attachments_json(&version.attachments)?,
            opt_uuid_text(version.workspace_id),
            version.user_id.to_string(),
            version.created_at,
        ],
    )?;
    Ok(())
}

/// All versions, highest number first
pub fn list_versions(conn: &Connection, article_id: Uuid) -> StoreResult<Vec<ArticleVersion>> {
    let sql = format!(
        "SELECT {} FROM article_versions WHERE article_id = ?1 ORDER BY version_number DESC",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let versions = stmt
        .query_map([article_id.to_string()], version_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(versions)
}

pub fn find_version(
    conn: &Connection,
    article_id: Uuid,
    version_number: i64,
) -> StoreResult<Option<ArticleVersion>> {
    let sql = format!(
        "SELECT {} FROM article_versions WHERE article_id = ?1 AND version_number = ?2",
        COLUMNS
    );
    let version = conn
        .query_row(
            &sql,
            params![article_id.to_string(), version_number],
            version_from_row,
        )
        .optional()?;
    Ok(version)
}

/// Attachment list of every version, keyed by version number (ascending)
pub fn attachment_history(
    conn: &Connection,
    article_id: Uuid,
) -> StoreResult<Vec<(i64, Vec<Attachment>)>> {
    let mut stmt = conn.prepare(
        "SELECT version_number, attachments FROM article_versions
         WHERE article_id = ?1 ORDER BY version_number ASC",
    )?;
    let history = stmt
        .query_map([article_id.to_string()], |row| {
            Ok((row.get(0)?, attachments_at(row, 1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(history)
}
