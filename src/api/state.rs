//! Shared application state

use std::path::PathBuf;
use std::sync::Arc;

use crate::articles::ArticleMutationCoordinator;
use crate::auth::{JwtAuth, SharedJwtAuth, UserService};
use crate::blob::FsBlobStore;
use crate::comments::CommentService;
use crate::config::AppConfig;
use crate::store::Database;
use crate::types::ServerResult;

use super::websocket::EventBroadcaster;

/// Broadcast buffer; slower clients miss events and are told to refresh
const BROADCAST_CAPACITY: usize = 1024;

/// State shared by every handler
pub struct AppState {
    pub db: Arc<Database>,
    pub articles: ArticleMutationCoordinator,
    pub comments: CommentService,
    pub users: UserService,
    pub jwt: SharedJwtAuth,
    pub broadcaster: Arc<EventBroadcaster>,
    pub uploads_dir: PathBuf,
    /// Allowed CORS origin; `None` allows any
    pub cors_origin: Option<String>,
}

impl AppState {
    /// Wire services over an open store and blob directory
    pub fn new(db: Arc<Database>, blobs: Arc<FsBlobStore>, jwt: SharedJwtAuth) -> Self {
        let broadcaster = Arc::new(EventBroadcaster::new(BROADCAST_CAPACITY));
        let uploads_dir = blobs.root().to_path_buf();

        let articles = ArticleMutationCoordinator::new(db.clone(), blobs)
            .with_notifier(broadcaster.clone());

        Self {
            comments: CommentService::new(db.clone()),
            users: UserService::new(db.clone(), jwt.clone()),
            db,
            articles,
            jwt,
            broadcaster,
            uploads_dir,
            cors_origin: None,
        }
    }

    /// Open the store, blob directory and signing key described by `config`
    pub fn from_config(config: &AppConfig) -> ServerResult<Self> {
        let db = Arc::new(Database::open(config.store.clone())?);
        let blobs = Arc::new(FsBlobStore::open(&config.uploads_dir)?);
        let jwt = JwtAuth::from_secret_or_file(config.jwt_secret.as_deref(), &config.jwt_secret_file)?
            .with_ttl(config.token_ttl);

        let mut state = Self::new(db, blobs, Arc::new(jwt));
        state.cors_origin = config.cors_origin.clone();
        Ok(state)
    }

    /// Override the bcrypt work factor used for new passwords
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.users = self.users.with_bcrypt_cost(cost);
        self
    }

    /// Get the current broadcast sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.broadcaster.current_sequence_id()
    }
}
