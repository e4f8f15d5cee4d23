//! Data types for the article service
//!
//! This module contains all the core data structures used throughout the application.

mod article;
mod comment;
mod user;
mod version;
mod workspace;

pub use article::{
    Article, ArticleDetail, ArticleDraft, Attachment, UploadedFile, WorkspaceFilter,
};
pub use comment::{Comment, CommentView};
pub use user::User;
pub use version::{ArticleRevision, ArticleVersion};
pub use workspace::{Workspace, WorkspaceRef};

/// Result type for top-level server setup
pub type ServerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
