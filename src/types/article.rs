//! Article and attachment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CommentView, WorkspaceRef};

/// A file reference embedded in an article's (or version's) attachment list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Name of the blob in the uploads directory
    pub filename: String,
    /// Display name as uploaded by the user
    #[serde(rename = "originalName")]
    pub original_name: String,
    /// Size in bytes
    pub size: u64,
}

/// Current state of an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub workspace_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Find an attachment by stored filename
    pub fn attachment(&self, filename: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.filename == filename)
    }

    pub fn has_attachment(&self, filename: &str) -> bool {
        self.attachment(filename).is_some()
    }
}

/// Caller-supplied fields for creating or replacing an article
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub workspace_id: Option<Uuid>,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            workspace_id: None,
        }
    }

    pub fn in_workspace(mut self, workspace_id: Uuid) -> Self {
        self.workspace_id = Some(workspace_id);
        self
    }
}

/// A file already accepted by the upload intake (type and size checked,
/// bytes written to the blob store)
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub stored_filename: String,
    pub original_name: String,
    pub size_bytes: u64,
}

impl UploadedFile {
    pub fn into_attachment(self) -> Attachment {
        Attachment {
            filename: self.stored_filename,
            original_name: self.original_name,
            size: self.size_bytes,
        }
    }
}

/// Article with its workspace, owner and most recent comments
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    pub comments: Vec<CommentView>,
}

/// Which workspace an article listing is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceFilter {
    /// No restriction
    #[default]
    Any,
    /// Only articles without a workspace
    Unassigned,
    /// Only articles in the given workspace
    Only(Uuid),
}
