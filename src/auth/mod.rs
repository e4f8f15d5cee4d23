//! Accounts and bearer-token authentication
//!
//! Passwords are stored as bcrypt hashes. Login issues an HS256 JWT that
//! carries the user id and email; mutating HTTP routes require it as
//! `Authorization: Bearer <token>`.

mod jwt;
mod users;

pub use jwt::{Claims, JwtAuth, SharedJwtAuth};
pub use users::{LoginResponse, UserService};

use crate::error::ArticleError;
use crate::store::StoreError;

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Access token required")]
    MissingToken,

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registration input or storage failure
    #[error(transparent)]
    Account(#[from] ArticleError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::Account(e.into())
    }
}

impl AuthError {
    /// Whether the caller should see 401 rather than a server error
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::InvalidToken(_)
                | AuthError::TokenExpired
                | AuthError::MissingToken
        )
    }
}
