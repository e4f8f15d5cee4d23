//! REST API module for HTTP endpoints
//!
//! - `articles`: article CRUD, versions and notify-update
//! - `attachments`: multipart upload and detach
//! - `comments`: comment CRUD
//! - `workspaces`: read-only workspace listing
//! - `auth`: register, login and token verification
//!
//! The core is synchronous; handlers move store work onto the blocking
//! pool with [`blocking`].

pub mod articles;
pub mod attachments;
pub mod auth;
pub mod comments;
pub mod workspaces;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::auth::{AuthError, Claims};
use crate::error::{ArticleError, ErrorKind};
use crate::validation::parse_id;

/// Common pagination parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    /// Maximum number of items to return (0 means the default page)
    #[serde(default)]
    pub limit: usize,
    /// Number of items to skip
    #[serde(default)]
    pub offset: usize,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn with_code(message: impl Into<String>, code: &str) -> Self {
        Self {
            error: message.into(),
            code: code.to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(message, "NOT_FOUND")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(message, "BAD_REQUEST")
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_code(message, "UNAUTHORIZED")
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_code(message, "CONFLICT")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code(message, "INTERNAL_ERROR")
    }
}

/// Error half of every handler result
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub body: ApiError,
}

impl ApiFailure {
    pub fn new(status: StatusCode, body: ApiError) -> Self {
        Self { status, body }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::bad_request(message))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal(message))
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ArticleError> for ApiFailure {
    fn from(e: ArticleError) -> Self {
        match e.kind() {
            ErrorKind::ValidationFailed => Self::bad_request(e.to_string()),
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, ApiError::not_found(e.to_string())),
            ErrorKind::Conflict => Self::new(StatusCode::CONFLICT, ApiError::conflict(e.to_string())),
            ErrorKind::StorageFailure | ErrorKind::ResourceCleanupFailure => {
                error!(error = %e, "request failed");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<AuthError> for ApiFailure {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Account(inner) => inner.into(),
            e if e.is_unauthorized() => {
                Self::new(StatusCode::UNAUTHORIZED, ApiError::unauthorized(e.to_string()))
            }
            e => {
                error!(error = %e, "authentication failure");
                Self::internal("Internal server error")
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiFailure>;

/// Run synchronous store work on the blocking pool
pub async fn blocking<T, E, F>(work: F) -> ApiResult<T>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiFailure> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(Into::into),
        Err(e) => {
            error!(error = %e, "blocking task failed");
            Err(ApiFailure::internal("Internal server error"))
        }
    }
}

pub fn article_id(raw: &str) -> ApiResult<Uuid> {
    Ok(parse_id(raw, "Invalid article ID format")?)
}

/// Claims of the caller, taken from `Authorization: Bearer <token>`
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        Ok(AuthUser(state.jwt.validate_authorization(header)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_map_to_status() {
        let cases = [
            (ArticleError::validation("bad"), StatusCode::BAD_REQUEST),
            (ArticleError::not_found("Article"), StatusCode::NOT_FOUND),
            (
                ArticleError::Conflict {
                    article_id: Uuid::nil(),
                    attempts: 3,
                },
                StatusCode::CONFLICT,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiFailure::from(err).status, status);
        }
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        let failure = ApiFailure::from(AuthError::MissingToken);
        assert_eq!(failure.status, StatusCode::UNAUTHORIZED);
        assert_eq!(failure.body.error, "Access token required");
    }

    #[test]
    fn test_article_id_parsing() {
        let failure = article_id("not-a-uuid").unwrap_err();
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.body.error, "Invalid article ID format");
    }
}
