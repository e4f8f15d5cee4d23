//! Immutable article version snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Article, Attachment};

/// Snapshot of an article as it stood after one mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleVersion {
    pub id: Uuid,
    pub article_id: Uuid,
    /// Positive, unique per article, strictly increasing
    pub version_number: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub workspace_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ArticleVersion {
    /// Build the snapshot for `article` under the given number
    pub fn snapshot(article: &Article, version_number: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            article_id: article.id,
            version_number,
            title: article.title.clone(),
            content: article.content.clone(),
            attachments: article.attachments.clone(),
            workspace_id: article.workspace_id,
            user_id: article.user_id,
            created_at,
        }
    }

    pub fn references(&self, filename: &str) -> bool {
        self.attachments.iter().any(|a| a.filename == filename)
    }
}

/// Outcome of a successful mutation: the committed article row and the
/// version it produced
#[derive(Debug, Clone, Serialize)]
pub struct ArticleRevision {
    pub article: Article,
    pub version: ArticleVersion,
}

impl ArticleRevision {
    pub fn version_number(&self) -> i64 {
        self.version.version_number
    }
}
