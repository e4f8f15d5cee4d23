//! Table definitions and workspace seeding

use chrono::Utc;
use rusqlite::{params, Connection};

use super::StoreResult;

/// Workspaces inserted into an empty database: (id, name, description)
pub const SEEDED_WORKSPACES: &[(&str, &str, &str)] = &[
    (
        "550e8400-e29b-41d4-a716-446655440001",
        "General",
        "General articles and discussions",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440002",
        "Technology",
        "Technology-related articles",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440003",
        "Science",
        "Scientific articles and research",
    ),
    (
        "550e8400-e29b-41d4-a716-446655440004",
        "Business",
        "Business and entrepreneurship",
    ),
];

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workspaces (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS articles (
    id           TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    content      TEXT NOT NULL,
    attachments  TEXT NOT NULL DEFAULT '[]',
    workspace_id TEXT REFERENCES workspaces(id) ON DELETE SET NULL,
    user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_articles_workspace ON articles(workspace_id);
CREATE INDEX IF NOT EXISTS idx_articles_created ON articles(created_at);

CREATE TABLE IF NOT EXISTS article_versions (
    id             TEXT PRIMARY KEY,
    article_id     TEXT NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
    version_number INTEGER NOT NULL CHECK (version_number > 0),
    title          TEXT NOT NULL,
    content        TEXT NOT NULL,
    attachments    TEXT NOT NULL DEFAULT '[]',
    workspace_id   TEXT,
    user_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at     TEXT NOT NULL,
    UNIQUE (article_id, version_number)
);

CREATE TABLE IF NOT EXISTS comments (
    id         TEXT PRIMARY KEY,
    article_id TEXT NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
    user_id    TEXT REFERENCES users(id) ON DELETE SET NULL,
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_article ON comments(article_id, created_at);
";

/// Create all tables and indexes if they do not exist
pub fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Insert the default workspaces when the table is empty
///
/// Returns the number of rows inserted.
pub fn seed_workspaces(conn: &Connection) -> StoreResult<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM workspaces", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let now = Utc::now();
    let mut inserted = 0;
    for (id, name, description) in SEEDED_WORKSPACES {
        inserted += conn.execute(
            "INSERT OR IGNORE INTO workspaces (id, name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id, name, description, now],
        )?;
    }
    Ok(inserted)
}
