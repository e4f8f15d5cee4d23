//! Article endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{article_id, blocking, ApiFailure, ApiResult, AuthUser};
use crate::api::state::AppState;
use crate::articles::DEFAULT_PAGE_SIZE;
use crate::error::ArticleError;
use crate::events::ArticleEvent;
use crate::types::{Article, ArticleDetail, ArticleDraft, ArticleVersion, WorkspaceFilter};
use crate::validation::parse_id;

/// Query parameters for listing articles
#[derive(Debug, Deserialize)]
pub struct ListArticlesParams {
    /// Workspace id, or `null` for articles without one
    pub workspace_id: Option<String>,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Body of create and update requests
#[derive(Debug, Deserialize)]
pub struct ArticleBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Empty or absent means no workspace
    #[serde(default)]
    pub workspace_id: Option<String>,
}

impl ArticleBody {
    fn into_draft(self) -> ApiResult<ArticleDraft> {
        let workspace_id = match self.workspace_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_id(raw, "Invalid workspace ID format")?),
        };
        Ok(ArticleDraft {
            title: self.title,
            content: self.content,
            workspace_id,
        })
    }
}

/// Acknowledgement for create and update
#[derive(Debug, Serialize)]
pub struct ArticleAck {
    pub id: Uuid,
    pub version: i64,
    pub message: &'static str,
}

fn workspace_filter(raw: Option<&str>) -> ApiResult<WorkspaceFilter> {
    match raw.map(str::trim) {
        None | Some("") => Ok(WorkspaceFilter::Any),
        Some("null") => Ok(WorkspaceFilter::Unassigned),
        Some(id) => Ok(WorkspaceFilter::Only(parse_id(id, "Invalid workspace ID format")?)),
    }
}

/// GET /api/articles - Newest first, optionally by workspace
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListArticlesParams>,
) -> ApiResult<Json<Vec<Article>>> {
    let filter = workspace_filter(params.workspace_id.as_deref())?;
    let articles = blocking(move || state.articles.list_articles(filter, params.page, params.limit)).await?;
    Ok(Json(articles))
}

/// GET /api/articles/:id - Article with workspace, owner and comments
pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ArticleDetail>> {
    let id = article_id(&id)?;
    let detail = blocking(move || state.articles.get_article(id)).await?;
    Ok(Json(detail))
}

/// POST /api/articles
pub async fn create_article(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(body): Json<ArticleBody>,
) -> ApiResult<impl IntoResponse> {
    let draft = body.into_draft()?;
    let revision = blocking(move || state.articles.create_article(claims.user_id(), draft)).await?;

    Ok((
        StatusCode::CREATED,
        Json(ArticleAck {
            id: revision.article.id,
            version: revision.version_number(),
            message: "Article created successfully",
        }),
    ))
}

/// PUT /api/articles/:id
pub async fn update_article(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ArticleBody>,
) -> ApiResult<Json<ArticleAck>> {
    let id = article_id(&id)?;
    let draft = body.into_draft()?;
    let revision =
        blocking(move || state.articles.update_article(id, claims.user_id(), draft)).await?;

    Ok(Json(ArticleAck {
        id,
        version: revision.version_number(),
        message: "Article updated successfully",
    }))
}

/// DELETE /api/articles/:id - Article, versions, comments and blobs
pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = article_id(&id)?;
    blocking(move || state.articles.delete_article(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct NotifyBody {
    pub title: Option<String>,
}

/// POST /api/articles/:id/notify-update - Re-broadcast the latest version
pub async fn notify_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<NotifyBody>>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = article_id(&id)?;
    let title = body.and_then(|Json(b)| b.title);

    let worker = state.clone();
    let latest = blocking(move || worker.articles.get_version_history(id)).await?;
    let head = latest
        .into_iter()
        .next()
        .ok_or_else(|| ApiFailure::from(ArticleError::not_found("Article version")))?;

    state.broadcaster.broadcast(ArticleEvent::ArticleUpdated {
        article_id: id,
        title: title.unwrap_or(head.title),
        version: head.version_number,
    });

    Ok(Json(json!({ "message": "Notification sent" })))
}

/// GET /api/articles/:id/versions - Highest version first
pub async fn list_versions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ArticleVersion>>> {
    let id = article_id(&id)?;
    let versions = blocking(move || state.articles.get_version_history(id)).await?;
    Ok(Json(versions))
}

/// GET /api/articles/:id/versions/:version
pub async fn get_version(
    State(state): State<Arc<AppState>>,
    Path((id, version)): Path<(String, String)>,
) -> ApiResult<Json<ArticleVersion>> {
    let id = article_id(&id)?;
    let number: i64 = version
        .parse()
        .map_err(|_| ApiFailure::bad_request("Invalid version number"))?;

    let version = blocking(move || state.articles.get_version(id, number)).await?;
    Ok(Json(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_filter_parsing() {
        assert_eq!(workspace_filter(None).unwrap(), WorkspaceFilter::Any);
        assert_eq!(workspace_filter(Some("null")).unwrap(), WorkspaceFilter::Unassigned);

        let id = Uuid::new_v4();
        assert_eq!(
            workspace_filter(Some(&id.to_string())).unwrap(),
            WorkspaceFilter::Only(id)
        );
        assert!(workspace_filter(Some("nope")).is_err());
    }

    #[test]
    fn test_empty_workspace_means_none() {
        let body = ArticleBody {
            title: "t".to_string(),
            content: "c".to_string(),
            workspace_id: Some(String::new()),
        };
        assert_eq!(body.into_draft().unwrap().workspace_id, None);
    }
}
