//! Error taxonomy for article operations
//!
//! Every failure a mutation or query can signal is an [`ArticleError`].
//! The boundary layer inspects [`ArticleError::kind`] to pick a response,
//! so variants must stay distinguishable by kind rather than by message.

use uuid::Uuid;

use crate::store::StoreError;

/// Result type for article operations
pub type ArticleResult<T> = Result<T, ArticleError>;

/// Coarse classification of an [`ArticleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailed,
    NotFound,
    Conflict,
    StorageFailure,
    ResourceCleanupFailure,
}

/// Errors surfaced by the article coordinator and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    /// Input violated a title/content/filename/account constraint
    #[error("{0}")]
    ValidationFailed(String),

    /// Article, workspace, attachment, version or comment is absent
    #[error("{0} not found")]
    NotFound(String),

    /// Version sequencing kept colliding until the retry budget ran out
    #[error("version number conflict on article {article_id} after {attempts} attempts")]
    Conflict { article_id: Uuid, attempts: u32 },

    /// The store rejected the operation; the transaction was rolled back
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StoreError),

    /// A blob with this stored filename is already present and is never
    /// overwritten
    #[error("blob '{0}' already exists")]
    BlobExists(String),

    /// A blob could not be removed after the logical change committed
    #[error("failed to remove blob '{filename}': {reason}")]
    ResourceCleanupFailure { filename: String, reason: String },
}

impl ArticleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ArticleError::ValidationFailed(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ArticleError::NotFound(what.into())
    }

    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArticleError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            ArticleError::NotFound(_) => ErrorKind::NotFound,
            ArticleError::Conflict { .. } | ArticleError::BlobExists(_) => ErrorKind::Conflict,
            ArticleError::StorageFailure(_) => ErrorKind::StorageFailure,
            ArticleError::ResourceCleanupFailure { .. } => ErrorKind::ResourceCleanupFailure,
        }
    }
}
