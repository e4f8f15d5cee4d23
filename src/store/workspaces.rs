//! `workspaces` table access

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::rows::uuid_at;
use super::StoreResult;
use crate::types::Workspace;

fn workspace_from_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: uuid_at(row, 0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

pub fn insert_workspace(conn: &Connection, workspace: &Workspace) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO workspaces (id, name, description, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            workspace.id.to_string(),
            workspace.name,
            workspace.description,
            workspace.created_at,
            workspace.updated_at,
        ],
    )?;
    Ok(())
}

pub fn find_workspace(conn: &Connection, id: Uuid) -> StoreResult<Option<Workspace>> {
    let workspace = conn
        .query_row(
            "SELECT id, name, description, created_at, updated_at FROM workspaces WHERE id = ?1",
            [id.to_string()],
            workspace_from_row,
        )
        .optional()?;
    Ok(workspace)
}

/// Oldest first
pub fn list_workspaces(conn: &Connection) -> StoreResult<Vec<Workspace>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, created_at, updated_at FROM workspaces
         ORDER BY created_at ASC, rowid ASC",
    )?;
    let workspaces = stmt
        .query_map([], workspace_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(workspaces)
}
