//! Article mutation coordinator
//!
//! Every mutation runs as one write transaction spanning the article row
//! and the version it produces:
//!
//! ```text
//! validate ──► BEGIN IMMEDIATE ──► load/mutate row ──► next version ──► snapshot ──► COMMIT
//!                                                                                     │
//!                                          notify + (detach/delete) remove blobs ◄────┘
//! ```
//!
//! Nothing outside the transaction (blob I/O, notifications) happens while
//! the write lock is held. Blob removal and notification follow a
//! successful commit and their failures are logged, never returned.

mod mutation;
mod query;

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::blob::BlobStore;
use crate::error::{ArticleError, ArticleResult};
use crate::events::{NoopNotifier, Notifier};
use crate::store::{articles, workspaces, Database, WriteTxn};
use crate::types::{
    Article, ArticleDetail, ArticleDraft, ArticleRevision, ArticleVersion, UploadedFile,
    WorkspaceFilter,
};
use crate::versioning::{AttachmentLedger, VersionSequencer, VersionStore};

pub use query::{DEFAULT_PAGE_SIZE, MAX_COMMENTS_PER_ARTICLE};

/// Orchestrates article mutations over the store, blob store and notifier
pub struct ArticleMutationCoordinator {
    pub(crate) db: Arc<Database>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) sequencer: VersionSequencer,
    pub(crate) versions: VersionStore,
    pub(crate) ledger: AttachmentLedger,
}

impl ArticleMutationCoordinator {
    /// Create a coordinator that discards notifications
    pub fn new(db: Arc<Database>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            db,
            blobs,
            notifier: Arc::new(NoopNotifier),
            sequencer: VersionSequencer::default(),
            versions: VersionStore,
            ledger: AttachmentLedger,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_sequencer(mut self, sequencer: VersionSequencer) -> Self {
        self.sequencer = sequencer;
        self
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    /// Sequence and store the snapshot of the article row as it stands in `tx`
    pub(crate) fn append_version(
        &self,
        tx: &WriteTxn<'_>,
        article_id: Uuid,
    ) -> ArticleResult<ArticleVersion> {
        self.sequencer
            .assign(tx, article_id, |n| self.versions.create_version(tx, article_id, n))
    }

    /// Best-effort blob removal after a committed change
    pub(crate) fn release_blob(&self, article_id: Uuid, filename: &str) {
        match self.blobs.delete(filename) {
            Ok(()) => debug!(%article_id, filename, "blob removed"),
            Err(e) => warn!(%article_id, filename, error = %e, "blob cleanup failed"),
        }
    }
}

/// Load the article row inside `tx` or fail with NotFound
pub(crate) fn load_article(tx: &WriteTxn<'_>, article_id: Uuid) -> ArticleResult<Article> {
    articles::find_article(tx, article_id)?.ok_or_else(|| ArticleError::not_found("Article"))
}

pub(crate) fn ensure_workspace(tx: &WriteTxn<'_>, workspace_id: Option<Uuid>) -> ArticleResult<()> {
    if let Some(id) = workspace_id {
        if workspaces::find_workspace(tx, id)?.is_none() {
            return Err(ArticleError::not_found("Workspace"));
        }
    }
    Ok(())
}

// Operations from submodules
impl ArticleMutationCoordinator {
    pub fn create_article(&self, user_id: Uuid, draft: ArticleDraft) -> ArticleResult<ArticleRevision> {
        mutation::create_article(self, user_id, draft)
    }

    pub fn update_article(
        &self,
        article_id: Uuid,
        user_id: Uuid,
        draft: ArticleDraft,
    ) -> ArticleResult<ArticleRevision> {
        mutation::update_article(self, article_id, user_id, draft)
    }

    pub fn add_attachment(&self, article_id: Uuid, upload: UploadedFile) -> ArticleResult<ArticleRevision> {
        mutation::add_attachment(self, article_id, upload)
    }

    pub fn remove_attachment(&self, article_id: Uuid, filename: &str) -> ArticleResult<ArticleRevision> {
        mutation::remove_attachment(self, article_id, filename)
    }

    pub fn delete_article(&self, article_id: Uuid) -> ArticleResult<Article> {
        mutation::delete_article(self, article_id)
    }

    pub fn list_articles(
        &self,
        filter: WorkspaceFilter,
        page: usize,
        limit: usize,
    ) -> ArticleResult<Vec<Article>> {
        query::list_articles(self, filter, page, limit)
    }

    pub fn get_article(&self, article_id: Uuid) -> ArticleResult<ArticleDetail> {
        query::get_article(self, article_id)
    }

    pub fn get_version_history(&self, article_id: Uuid) -> ArticleResult<Vec<ArticleVersion>> {
        query::get_version_history(self, article_id)
    }

    pub fn get_version(&self, article_id: Uuid, version_number: i64) -> ArticleResult<ArticleVersion> {
        query::get_version(self, article_id, version_number)
    }
}
