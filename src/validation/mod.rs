//! Input validation for articles, uploads and accounts
//!
//! Validation runs before any transaction is opened, so a rejected
//! request never touches the store.

mod account;
mod article;
mod file;

pub use account::{is_valid_email, parse_id, validate_credentials, MIN_PASSWORD_LENGTH};
pub use article::{
    article_errors, validate_comment, validate_draft, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH,
};
pub use file::{
    is_allowed_upload, sanitize_filename, stored_filename, unique_stored_filename, validate_file_size,
    validate_stored_filename, ALLOWED_FILE_EXTENSIONS, ALLOWED_FILE_TYPES, FILE_SIZE_LIMIT,
    INVALID_FILE_TYPE,
};
