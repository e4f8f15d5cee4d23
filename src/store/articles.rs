//! `articles` table access

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::rows::{
    attachments_at, attachments_json, opt_uuid_at, opt_uuid_text, sql_count, uuid_at,
};
use super::StoreResult;
use crate::types::{Article, WorkspaceFilter, WorkspaceRef};

const COLUMNS: &str =
    "a.id, a.title, a.content, a.attachments, a.workspace_id, a.user_id, a.created_at, a.updated_at";

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    Ok(Article {
        id: uuid_at(row, 0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        attachments: attachments_at(row, 3)?,
        workspace_id: opt_uuid_at(row, 4)?,
        user_id: uuid_at(row, 5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn insert_article(conn: &Connection, article: &Article) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO articles (id, title, content, attachments, workspace_id, user_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            article.id.to_string(),
            article.title,
            article.content,
            attachments_json(&article.attachments)?,
            opt_uuid_text(article.workspace_id),
            article.user_id.to_string(),
            article.created_at,
            article.updated_at,
        ],
    )?;
    Ok(())
}

/// Overwrite every mutable column of an existing row
///
/// Returns false if the row no longer exists.
pub fn update_article(conn: &Connection, article: &Article) -> StoreResult<bool> {
    let changed = conn.execute(
        "UPDATE articles
         SET title = ?2, content = ?3, attachments = ?4, workspace_id = ?5, user_id = ?6, updated_at = ?7
         WHERE id = ?1",
        params![
            article.id.to_string(),
            article.title,
            article.content,
            attachments_json(&article.attachments)?,
            opt_uuid_text(article.workspace_id),
            article.user_id.to_string(),
            article.updated_at,
        ],
    )?;
    Ok(changed > 0)
}

pub fn find_article(conn: &Connection, id: Uuid) -> StoreResult<Option<Article>> {
    let sql = format!("SELECT {} FROM articles a WHERE a.id = ?1", COLUMNS);
    let article = conn
        .query_row(&sql, [id.to_string()], article_from_row)
        .optional()?;
    Ok(article)
}

pub fn article_exists(conn: &Connection, id: Uuid) -> StoreResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM articles WHERE id = ?1", [id.to_string()], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

/// Delete the row; versions and comments go with it via ON DELETE CASCADE
pub fn delete_article(conn: &Connection, id: Uuid) -> StoreResult<bool> {
    let changed = conn.execute("DELETE FROM articles WHERE id = ?1", [id.to_string()])?;
    Ok(changed > 0)
}

/// Newest first, one page at a time
pub fn list_articles(
    conn: &Connection,
    filter: WorkspaceFilter,
    limit: usize,
    offset: usize,
) -> StoreResult<Vec<Article>> {
    let (clause, workspace) = match filter {
        WorkspaceFilter::Any => ("1 = 1", None),
        WorkspaceFilter::Unassigned => ("a.workspace_id IS NULL", None),
        WorkspaceFilter::Only(id) => ("a.workspace_id = ?3", Some(id.to_string())),
    };
    let sql = format!(
        "SELECT {} FROM articles a WHERE {} ORDER BY a.created_at DESC, a.rowid DESC LIMIT ?1 OFFSET ?2",
        COLUMNS, clause
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = match workspace {
        Some(ws) => stmt
            .query_map(params![sql_count(limit), sql_count(offset), ws], article_from_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt
            .query_map(params![sql_count(limit), sql_count(offset)], article_from_row)?
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(rows)
}

/// Workspace id/name and owner email for an article
pub fn article_context(
    conn: &Connection,
    article: &Article,
) -> StoreResult<(Option<WorkspaceRef>, Option<String>)> {
    let workspace = match article.workspace_id {
        Some(ws) => conn
            .query_row(
                "SELECT id, name FROM workspaces WHERE id = ?1",
                [ws.to_string()],
                |row| {
                    Ok(WorkspaceRef {
                        id: uuid_at(row, 0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?,
        None => None,
    };

    let email = conn
        .query_row(
            "SELECT email FROM users WHERE id = ?1",
            [article.user_id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    Ok((workspace, email))
}
