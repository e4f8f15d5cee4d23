//! Workspace endpoints (read-only)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::{blocking, ApiResult};
use crate::api::state::AppState;
use crate::error::{ArticleError, ArticleResult};
use crate::store::workspaces;
use crate::types::Workspace;
use crate::validation::parse_id;

/// GET /api/workspaces - Oldest first
pub async fn list_workspaces(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Workspace>>> {
    let list = blocking(move || -> ArticleResult<_> {
        let conn = state.db.read()?;
        Ok(workspaces::list_workspaces(&conn)?)
    })
    .await?;
    Ok(Json(list))
}

/// GET /api/workspaces/:id
pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Workspace>> {
    let id = parse_id(&id, "Invalid workspace ID format")?;
    let workspace = blocking(move || -> ArticleResult<_> {
        let conn = state.db.read()?;
        workspaces::find_workspace(&conn, id)?.ok_or_else(|| ArticleError::not_found("Workspace"))
    })
    .await?;
    Ok(Json(workspace))
}
