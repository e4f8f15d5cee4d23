//! `users` table access

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::rows::uuid_at;
use super::StoreResult;
use crate::types::User;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_at(row, 0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn insert_user(conn: &Connection, user: &User) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO users (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user.id.to_string(), user.email, user.password_hash, user.created_at],
    )?;
    Ok(())
}

pub fn find_user_by_email(conn: &Connection, email: &str) -> StoreResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
            [email],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn find_user(conn: &Connection, id: Uuid) -> StoreResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
            [id.to_string()],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}
