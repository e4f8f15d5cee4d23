//! Attachment upload and removal
//!
//! Upload intake: type/size checks, blob write under an unused stored
//! filename, then
//! [`add_attachment`](crate::articles::ArticleMutationCoordinator::add_attachment).
//! A blob this request wrote is removed again when the coordinator rejects
//! its attachment. Blobs written by anyone else are never touched here.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{article_id, blocking, ApiError, ApiFailure, ApiResult, AuthUser};
use crate::api::state::AppState;
use crate::articles::ArticleMutationCoordinator;
use crate::blob::BlobStore;
use crate::error::{ArticleError, ArticleResult};
use crate::types::{ArticleRevision, Attachment, UploadedFile};
use crate::validation::{
    is_allowed_upload, stored_filename, unique_stored_filename, validate_file_size,
    INVALID_FILE_TYPE,
};

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// Stored names tried before an upload gives up with a conflict
const NAME_ATTEMPTS: u32 = 4;

/// Attachment list after the change
#[derive(Debug, Serialize)]
pub struct AttachmentsResponse {
    pub message: &'static str,
    pub version: i64,
    pub attachments: Vec<Attachment>,
}

/// POST /api/articles/:id/attachments - multipart field `file`
pub async fn upload_attachment(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<AttachmentsResponse>> {
    let id = article_id(&id)?;

    let mut received = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_failure)?;
        received = Some((original_name, mime_type, bytes));
        break;
    }

    let (original_name, mime_type, bytes) =
        received.ok_or_else(|| ApiFailure::bad_request(INVALID_FILE_TYPE))?;
    if !is_allowed_upload(&mime_type, &original_name) {
        return Err(ApiFailure::bad_request(INVALID_FILE_TYPE));
    }
    validate_file_size(bytes.len() as u64)?;

    let unix_millis = Utc::now().timestamp_millis();
    let revision = blocking(move || {
        accept_upload(&state.articles, id, original_name, &bytes, unix_millis)
    })
    .await?;

    Ok(Json(AttachmentsResponse {
        message: "File uploaded",
        version: revision.version_number(),
        attachments: revision.article.attachments,
    }))
}

/// DELETE /api/articles/:id/attachments/:filename
pub async fn delete_attachment(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
    Path((id, filename)): Path<(String, String)>,
) -> ApiResult<Json<AttachmentsResponse>> {
    let id = article_id(&id)?;
    let revision = blocking(move || state.articles.remove_attachment(id, &filename)).await?;

    Ok(Json(AttachmentsResponse {
        message: "File deleted",
        version: revision.version_number(),
        attachments: revision.article.attachments,
    }))
}

/// Store the bytes under a fresh name and attach them to the article
pub(crate) fn accept_upload(
    articles: &ArticleMutationCoordinator,
    article_id: Uuid,
    original_name: String,
    bytes: &[u8],
    unix_millis: i64,
) -> ArticleResult<ArticleRevision> {
    let blobs = articles.blobs();
    let filename = store_blob(&**blobs, &original_name, bytes, unix_millis)?;

    let upload = UploadedFile {
        stored_filename: filename.clone(),
        original_name,
        size_bytes: bytes.len() as u64,
    };
    articles.add_attachment(article_id, upload).map_err(|e| {
        if let Err(cleanup) = blobs.delete(&filename) {
            warn!(%article_id, %filename, error = %cleanup, "failed to remove rejected upload");
        }
        e
    })
}

/// Write a new blob, picking another name while the candidate is taken
fn store_blob(
    blobs: &dyn BlobStore,
    original_name: &str,
    bytes: &[u8],
    unix_millis: i64,
) -> ArticleResult<String> {
    let mut filename = stored_filename(original_name, unix_millis);
    let mut attempt = 1;

    loop {
        match blobs.put(&filename, bytes) {
            Ok(()) => return Ok(filename),
            Err(ArticleError::BlobExists(_)) if attempt < NAME_ATTEMPTS => {
                debug!(%filename, attempt, "stored filename taken");
                filename = unique_stored_filename(original_name, unix_millis);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn multipart_failure(e: axum::extract::multipart::MultipartError) -> ApiFailure {
    ApiFailure::new(e.status(), ApiError::bad_request(e.body_text()))
}
