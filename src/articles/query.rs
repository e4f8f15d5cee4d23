//! Read-only article and version queries

use uuid::Uuid;

use super::ArticleMutationCoordinator;
use crate::error::{ArticleError, ArticleResult};
use crate::store::{articles, comments};
use crate::types::{Article, ArticleDetail, ArticleVersion, WorkspaceFilter};

/// Page size when a listing does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Comments embedded in an article detail
pub const MAX_COMMENTS_PER_ARTICLE: usize = 50;

/// Newest articles first; `page` is 1-based
pub fn list_articles(
    co: &ArticleMutationCoordinator,
    filter: WorkspaceFilter,
    page: usize,
    limit: usize,
) -> ArticleResult<Vec<Article>> {
    let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
    let offset = page.saturating_sub(1).saturating_mul(limit);

    let conn = co.db.read()?;
    Ok(articles::list_articles(&conn, filter, limit, offset)?)
}

/// Article with workspace, owner email and its most recent comments
pub fn get_article(co: &ArticleMutationCoordinator, article_id: Uuid) -> ArticleResult<ArticleDetail> {
    let conn = co.db.read()?;
    let article = articles::find_article(&conn, article_id)?
        .ok_or_else(|| ArticleError::not_found("Article"))?;

    let (workspace, owner_email) = articles::article_context(&conn, &article)?;
    let comments = comments::list_comments(&conn, article_id, MAX_COMMENTS_PER_ARTICLE, 0)?;

    Ok(ArticleDetail {
        article,
        workspace,
        owner_email,
        comments,
    })
}

/// All versions, highest number first
///
/// Deleted or never-created articles have no history and report NotFound.
pub fn get_version_history(
    co: &ArticleMutationCoordinator,
    article_id: Uuid,
) -> ArticleResult<Vec<ArticleVersion>> {
    let conn = co.db.read()?;
    if !articles::article_exists(&conn, article_id)? {
        return Err(ArticleError::not_found("Article"));
    }
    Ok(co.versions.list_versions(&conn, article_id)?)
}

pub fn get_version(
    co: &ArticleMutationCoordinator,
    article_id: Uuid,
    version_number: i64,
) -> ArticleResult<ArticleVersion> {
    let conn = co.db.read()?;
    co.versions.get_version(&conn, article_id, version_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::SEEDED_WORKSPACES;
    use crate::test_support::test_coordinator;
    use crate::types::ArticleDraft;

    #[test]
    fn test_list_pages_newest_first() {
        let env = test_coordinator();
        for i in 0..5 {
            env.coordinator
                .create_article(env.user_id, ArticleDraft::new(format!("T{}", i), "c"))
                .unwrap();
        }

        let first = env.coordinator.list_articles(WorkspaceFilter::Any, 1, 2).unwrap();
        let titles: Vec<_> = first.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["T4", "T3"]);

        let last = env.coordinator.list_articles(WorkspaceFilter::Any, 3, 2).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].title, "T0");
    }

    #[test]
    fn test_list_far_past_the_end_is_empty() {
        let env = test_coordinator();
        env.coordinator
            .create_article(env.user_id, ArticleDraft::new("Only", "c"))
            .unwrap();

        let page = env
            .coordinator
            .list_articles(WorkspaceFilter::Any, usize::MAX, 50)
            .unwrap();
        assert!(page.is_empty());

        let everything = env
            .coordinator
            .list_articles(WorkspaceFilter::Any, 1, usize::MAX)
            .unwrap();
        assert_eq!(everything.len(), 1);
    }

    #[test]
    fn test_list_filters_by_workspace() {
        let env = test_coordinator();
        let ws = Uuid::parse_str(SEEDED_WORKSPACES[1].0).unwrap();
        env.coordinator
            .create_article(env.user_id, ArticleDraft::new("In", "c").in_workspace(ws))
            .unwrap();
        env.coordinator
            .create_article(env.user_id, ArticleDraft::new("Out", "c"))
            .unwrap();

        let only = env.coordinator.list_articles(WorkspaceFilter::Only(ws), 1, 50).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].title, "In");

        let none = env
            .coordinator
            .list_articles(WorkspaceFilter::Unassigned, 1, 50)
            .unwrap();
        assert_eq!(none.len(), 1);
        assert_eq!(none[0].title, "Out");
    }

    #[test]
    fn test_get_article_includes_context() {
        let env = test_coordinator();
        let ws = Uuid::parse_str(SEEDED_WORKSPACES[0].0).unwrap();
        let id = env
            .coordinator
            .create_article(env.user_id, ArticleDraft::new("Notes", "Draft").in_workspace(ws))
            .unwrap()
            .article
            .id;

        let detail = env.coordinator.get_article(id).unwrap();
        assert_eq!(detail.workspace.map(|w| w.name), Some("General".to_string()));
        assert_eq!(detail.owner_email.as_deref(), Some("owner@example.com"));
        assert!(detail.comments.is_empty());
    }

    #[test]
    fn test_history_of_missing_article() {
        let env = test_coordinator();
        let err = env.coordinator.get_version_history(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_round_trip_version_one() {
        let env = test_coordinator();
        let id = env
            .coordinator
            .create_article(env.user_id, ArticleDraft::new(" Notes ", " Draft "))
            .unwrap()
            .article
            .id;

        let v1 = env.coordinator.get_version(id, 1).unwrap();
        assert_eq!((v1.title.as_str(), v1.content.as_str()), ("Notes", "Draft"));
    }
}
