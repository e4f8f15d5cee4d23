//! Attachment reachability across version history

use std::collections::BTreeSet;

use rusqlite::Connection;
use uuid::Uuid;

use crate::store::{versions, StoreResult};
use crate::types::Attachment;

/// Answers whether a blob is still needed by an article's history
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentLedger;

impl AttachmentLedger {
    /// Whether any persisted version other than the current head lists
    /// `filename`
    ///
    /// Must run before the version produced by the pending detach is
    /// written. The head at that moment is the version being superseded;
    /// its attachment list still contains the file by construction, so it
    /// is excluded.
    pub fn is_referenced_elsewhere(
        &self,
        conn: &Connection,
        article_id: Uuid,
        filename: &str,
    ) -> StoreResult<bool> {
        let history = versions::attachment_history(conn, article_id)?;
        let head = history.iter().map(|(n, _)| *n).max();
        Ok(referenced_outside(&history, filename, head))
    }

    /// Union of every filename referenced by any version of the article
    pub fn referenced_filenames(
        &self,
        conn: &Connection,
        article_id: Uuid,
    ) -> StoreResult<BTreeSet<String>> {
        let history = versions::attachment_history(conn, article_id)?;
        Ok(history
            .into_iter()
            .flat_map(|(_, attachments)| attachments.into_iter().map(|a| a.filename))
            .collect())
    }
}

/// Whether any version except `superseded` lists `filename`
pub fn referenced_outside(
    history: &[(i64, Vec<Attachment>)],
    filename: &str,
    superseded: Option<i64>,
) -> bool {
    history
        .iter()
        .filter(|(number, _)| Some(*number) != superseded)
        .any(|(_, attachments)| attachments.iter().any(|a| a.filename == filename))
}
