//! User account types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
