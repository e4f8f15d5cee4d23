//! Registration and login

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{AuthError, SharedJwtAuth};
use crate::error::ArticleError;
use crate::store::{users, Database};
use crate::types::User;
use crate::validation::validate_credentials;

/// Successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

/// Account operations backed by the `users` table
#[derive(Clone)]
pub struct UserService {
    db: Arc<Database>,
    jwt: SharedJwtAuth,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(db: Arc<Database>, jwt: SharedJwtAuth) -> Self {
        Self {
            db,
            jwt,
            bcrypt_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor (4..=31)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn jwt(&self) -> &SharedJwtAuth {
        &self.jwt
    }

    pub fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        validate_credentials(email, password)?;

        if users::find_user_by_email(&*self.db.read()?, email)?.is_some() {
            return Err(ArticleError::validation("Email already registered").into());
        }

        let password_hash =
            hash(password, self.bcrypt_cost).map_err(|e| AuthError::Hash(e.to_string()))?;
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        // A concurrent registration can still win the race; the UNIQUE
        // constraint on email decides.
        let tx = self.db.begin_write()?;
        match users::insert_user(&tx, &user) {
            Err(e) if e.is_unique_violation() => {
                return Err(ArticleError::validation("Email already registered").into())
            }
            other => other?,
        }
        tx.commit()?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(ArticleError::validation("Email and password are required").into());
        }

        let user = users::find_user_by_email(&*self.db.read()?, email.trim())?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify(password, &user.password_hash).unwrap_or(false) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.issue_token(&user)?;
        Ok(LoginResponse {
            token,
            email: user.email,
        })
    }
}
