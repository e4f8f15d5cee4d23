//! `comments` table access

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::rows::{opt_uuid_at, opt_uuid_text, sql_count, uuid_at};
use super::StoreResult;
use crate::types::{Comment, CommentView};

const VIEW_SQL: &str = "
SELECT c.id, c.article_id, c.user_id, c.content, c.created_at, c.updated_at, u.email
FROM comments c LEFT JOIN users u ON u.id = c.user_id";

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: uuid_at(row, 0)?,
        article_id: uuid_at(row, 1)?,
        user_id: opt_uuid_at(row, 2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn view_from_row(row: &Row<'_>) -> rusqlite::Result<CommentView> {
    Ok(CommentView {
        comment: comment_from_row(row)?,
        author_email: row.get(6)?,
    })
}

pub fn insert_comment(conn: &Connection, comment: &Comment) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO comments (id, article_id, user_id, content, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            comment.id.to_string(),
            comment.article_id.to_string(),
            opt_uuid_text(comment.user_id),
            comment.content,
            comment.created_at,
            comment.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find_comment(conn: &Connection, id: Uuid) -> StoreResult<Option<CommentView>> {
    let sql = format!("{} WHERE c.id = ?1", VIEW_SQL);
    let comment = conn
        .query_row(&sql, [id.to_string()], view_from_row)
        .optional()?;
    Ok(comment)
}

/// Newest first
pub fn list_comments(
    conn: &Connection,
    article_id: Uuid,
    limit: usize,
    offset: usize,
) -> StoreResult<Vec<CommentView>> {
    let sql = format!(
        "{} WHERE c.article_id = ?1 ORDER BY c.created_at DESC, c.rowid DESC LIMIT ?2 OFFSET ?3",
        VIEW_SQL
    );
    let mut stmt = conn.prepare(&sql)?;
    let comments = stmt
        .query_map(
            params![article_id.to_string(), sql_count(limit), sql_count(offset)],
            view_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

pub fn update_comment(conn: &Connection, comment: &Comment) -> StoreResult<bool> {
    let changed = conn.execute(
        "UPDATE comments SET content = ?2, updated_at = ?3 WHERE id = ?1",
        params![comment.id.to_string(), comment.content, comment.updated_at],
    )?;
    Ok(changed > 0)
}

pub fn delete_comment(conn: &Connection, id: Uuid) -> StoreResult<bool> {
    let changed = conn.execute("DELETE FROM comments WHERE id = ?1", [id.to_string()])?;
    Ok(changed > 0)
}
