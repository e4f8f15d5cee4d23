//! Comment endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::{article_id, blocking, ApiResult, AuthUser, PaginationParams};
use crate::api::state::AppState;
use crate::types::CommentView;
use crate::validation::parse_id;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub content: String,
}

fn comment_id(raw: &str) -> ApiResult<uuid::Uuid> {
    Ok(parse_id(raw, "Invalid comment ID format")?)
}

/// GET /api/articles/:id/comments - Newest first
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(page): Query<PaginationParams>,
) -> ApiResult<Json<Vec<CommentView>>> {
    let id = article_id(&id)?;
    let comments = blocking(move || state.comments.list(id, page.limit, page.offset)).await?;
    Ok(Json(comments))
}

/// POST /api/articles/:id/comments
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> ApiResult<impl IntoResponse> {
    let id = article_id(&id)?;
    let comment =
        blocking(move || state.comments.create(id, Some(claims.user_id()), &body.content)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/comments/:id
pub async fn get_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CommentView>> {
    let id = comment_id(&id)?;
    let comment = blocking(move || state.comments.get(id)).await?;
    Ok(Json(comment))
}

/// PUT /api/comments/:id
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> ApiResult<Json<CommentView>> {
    let id = comment_id(&id)?;
    let comment = blocking(move || state.comments.update(id, &body.content)).await?;
    Ok(Json(comment))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = comment_id(&id)?;
    blocking(move || state.comments.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
