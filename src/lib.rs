//! Article Vault
//!
//! A multi-user article service whose every change is kept as an immutable,
//! numbered version, with attachment blobs removed only once no version
//! references them.
//!
//! # Modules
//!
//! - `types`: Article, ArticleVersion, Attachment, Comment, Workspace, User
//! - `validation`: Title/content, upload and account rules
//! - `store`: SQLite persistence with a connection pool and write transactions
//! - `blob`: Attachment blob storage
//! - `versioning`: Version sequencing, snapshot storage, attachment ledger
//! - `articles`: The mutation coordinator and article queries
//! - `comments`: Unversioned article comments
//! - `auth`: Accounts, bcrypt and JWT
//! - `events`: Change notifications
//! - `api`: REST and WebSocket surface
//! - `config`: Environment configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use article_vault::blob::FsBlobStore;
//! use article_vault::store::{Database, StoreConfig};
//! use article_vault::types::ArticleDraft;
//! use article_vault::ArticleMutationCoordinator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(Database::open(StoreConfig::new("data/articles.db"))?);
//! let blobs = Arc::new(FsBlobStore::open("uploads")?);
//! let coordinator = ArticleMutationCoordinator::new(db, blobs);
//!
//! # let user_id = uuid::Uuid::new_v4();
//! let revision = coordinator.create_article(user_id, ArticleDraft::new("Notes", "Draft"))?;
//! assert_eq!(revision.version_number(), 1);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod articles;
pub mod auth;
pub mod blob;
pub mod comments;
pub mod config;
pub mod error;
pub mod events;
pub mod store;
pub mod types;
pub mod validation;
pub mod versioning;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items at crate root
pub use articles::ArticleMutationCoordinator;
pub use config::AppConfig;
pub use error::{ArticleError, ArticleResult, ErrorKind};
pub use types::{Article, ArticleRevision, ArticleVersion, Attachment};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
