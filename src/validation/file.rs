//! Upload and stored-filename rules

use std::path::Path;

use uuid::Uuid;

use crate::error::{ArticleError, ArticleResult};

/// Maximum attachment size (10 MiB)
pub const FILE_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Accepted MIME types for uploads
pub const ALLOWED_FILE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "application/pdf"];

/// Accepted file extensions for uploads (case-insensitive)
pub const ALLOWED_FILE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "pdf"];

pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only JPG, PNG, GIF, and PDF allowed";

/// Check both the declared MIME type and the original name's extension
pub fn is_allowed_upload(mime_type: &str, original_name: &str) -> bool {
    let mime_ok = ALLOWED_FILE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(mime_type));

    let ext_ok = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            ALLOWED_FILE_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false);

    mime_ok && ext_ok
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Stored name for a new upload: `<unix-millis>-<sanitized original>`
pub fn stored_filename(original_name: &str, unix_millis: i64) -> String {
    format!("{}-{}", unix_millis, sanitize_filename(original_name))
}

/// Fallback name when the plain stored name is taken:
/// `<unix-millis>-<8 hex chars>-<sanitized original>`
pub fn unique_stored_filename(original_name: &str, unix_millis: i64) -> String {
    let tag = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", unix_millis, &tag[..8], sanitize_filename(original_name))
}

/// Reject names that would resolve outside the uploads directory
pub fn validate_stored_filename(filename: &str) -> ArticleResult<()> {
    let invalid = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0'])
        || Path::new(filename).is_absolute();

    if invalid {
        return Err(ArticleError::validation("Invalid filename"));
    }
    Ok(())
}

/// Size policy shared by intake and the coordinator
pub fn validate_file_size(size_bytes: u64) -> ArticleResult<()> {
    if size_bytes > FILE_SIZE_LIMIT {
        return Err(ArticleError::validation("File size exceeds 10MB limit"));
    }
    Ok(())
}
