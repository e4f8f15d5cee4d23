//! Column decoding helpers shared by the table modules

use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use crate::types::Attachment;

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// LIMIT/OFFSET value; anything past `i64::MAX` clamps instead of wrapping
pub(crate) fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

pub(crate) fn uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn opt_uuid_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| Uuid::parse_str(&s).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn attachments_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<Attachment>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn attachments_json(attachments: &[Attachment]) -> serde_json::Result<String> {
    serde_json::to_string(attachments)
}

pub(crate) fn opt_uuid_text(id: Option<Uuid>) -> Option<String> {
    id.map(|id| id.to_string())
}
