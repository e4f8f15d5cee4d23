//! Account endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use super::{blocking, ApiResult, AuthUser};
use crate::api::state::AppState;
use crate::auth::LoginResponse;

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> ApiResult<impl IntoResponse> {
    let user = blocking(move || state.users.register(&body.email, &body.password)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "userId": user.id })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsBody>,
) -> ApiResult<Json<LoginResponse>> {
    let response = blocking(move || state.users.login(&body.email, &body.password)).await?;
    Ok(Json(response))
}

/// GET /api/auth/verify
pub async fn verify(AuthUser(claims): AuthUser) -> Json<serde_json::Value> {
    Json(json!({
        "valid": true,
        "user": { "id": claims.sub, "email": claims.email },
    }))
}
