//! Article comments
//!
//! Comments hang off an article but are outside version history: adding,
//! editing or deleting one never produces a version.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::articles::MAX_COMMENTS_PER_ARTICLE;
use crate::error::{ArticleError, ArticleResult};
use crate::store::{articles, comments, Database};
use crate::types::{Comment, CommentView};
use crate::validation::validate_comment;

/// Comment operations over the shared store
#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
}

impl CommentService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create(
        &self,
        article_id: Uuid,
        user_id: Option<Uuid>,
        content: &str,
    ) -> ArticleResult<CommentView> {
        let content = validate_comment(content)?;

        let tx = self.db.begin_write()?;
        if !articles::article_exists(&tx, article_id)? {
            return Err(ArticleError::not_found("Article"));
        }

        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            article_id,
            user_id,
            content,
            created_at: now,
            updated_at: now,
        };
        comments::insert_comment(&tx, &comment)?;
        let view = comments::find_comment(&tx, comment.id)?
            .ok_or_else(|| ArticleError::not_found("Comment"))?;
        tx.commit()?;

        info!(%article_id, comment_id = %comment.id, "comment created");
        Ok(view)
    }

    pub fn get(&self, comment_id: Uuid) -> ArticleResult<CommentView> {
        let conn = self.db.read()?;
        comments::find_comment(&conn, comment_id)?.ok_or_else(|| ArticleError::not_found("Comment"))
    }

    /// Newest first; `limit` of 0 means the default page
    pub fn list(&self, article_id: Uuid, limit: usize, offset: usize) -> ArticleResult<Vec<CommentView>> {
        let limit = if limit == 0 { MAX_COMMENTS_PER_ARTICLE } else { limit };
        let conn = self.db.read()?;
        Ok(comments::list_comments(&conn, article_id, limit, offset)?)
    }

    pub fn update(&self, comment_id: Uuid, content: &str) -> ArticleResult<CommentView> {
        let content = validate_comment(content)?;

        let tx = self.db.begin_write()?;
        let mut view = comments::find_comment(&tx, comment_id)?
            .ok_or_else(|| ArticleError::not_found("Comment"))?;
        view.comment.content = content;
        view.comment.updated_at = Utc::now();
        comments::update_comment(&tx, &view.comment)?;
        tx.commit()?;

        Ok(view)
    }

    pub fn delete(&self, comment_id: Uuid) -> ArticleResult<()> {
        let tx = self.db.begin_write()?;
        if !comments::delete_comment(&tx, comment_id)? {
            return Err(ArticleError::not_found("Comment"));
        }
        tx.commit()?;

        info!(%comment_id, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::test_coordinator;
    use crate::types::ArticleDraft;

    #[test]
    fn test_comment_lifecycle() {
        let env = test_coordinator();
        let service = CommentService::new(env.coordinator.database().clone());
        let id = env
            .coordinator
            .create_article(env.user_id, ArticleDraft::new("Notes", "Draft"))
            .unwrap()
            .article
            .id;

        let created = service.create(id, Some(env.user_id), "  nice  ").unwrap();
        assert_eq!(created.comment.content, "nice");
        assert_eq!(created.author_email.as_deref(), Some("owner@example.com"));

        let updated = service.update(created.comment.id, "better").unwrap();
        assert_eq!(updated.comment.content, "better");
        assert_eq!(service.list(id, 0, 0).unwrap().len(), 1);

        service.delete(created.comment.id).unwrap();
        let err = service.get(created.comment.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_offset_past_the_end_is_empty() {
        let env = test_coordinator();
        let service = CommentService::new(env.coordinator.database().clone());
        let id = env
            .coordinator
            .create_article(env.user_id, ArticleDraft::new("Notes", "Draft"))
            .unwrap()
            .article
            .id;
        service.create(id, None, "first").unwrap();

        assert!(service.list(id, 10, usize::MAX).unwrap().is_empty());
        assert_eq!(service.list(id, usize::MAX, 0).unwrap().len(), 1);
    }

    #[test]
    fn test_comments_do_not_create_versions() {
        let env = test_coordinator();
        let service = CommentService::new(env.coordinator.database().clone());
        let id = env
            .coordinator
            .create_article(env.user_id, ArticleDraft::new("Notes", "Draft"))
            .unwrap()
            .article
            .id;

        service.create(id, None, "hello").unwrap();
        assert_eq!(env.coordinator.get_version_history(id).unwrap().len(), 1);
    }

    #[test]
    fn test_comment_on_missing_article() {
        let env = test_coordinator();
        let service = CommentService::new(env.coordinator.database().clone());
        let err = service.create(Uuid::new_v4(), None, "hello").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_blank_comment_rejected() {
        let env = test_coordinator();
        let service = CommentService::new(env.coordinator.database().clone());
        let err = service.create(Uuid::new_v4(), None, "   ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[test]
    fn test_article_delete_cascades_comments() {
        let env = test_coordinator();
        let service = CommentService::new(env.coordinator.database().clone());
        let id = env
            .coordinator
            .create_article(env.user_id, ArticleDraft::new("Notes", "Draft"))
            .unwrap()
            .article
            .id;
        let comment = service.create(id, None, "bye").unwrap();

        env.coordinator.delete_article(id).unwrap();
        assert!(service.get(comment.comment.id).is_err());
    }
}
