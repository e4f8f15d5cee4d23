//! Fixtures shared by unit tests

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tempfile::TempDir;
use uuid::Uuid;

use crate::articles::ArticleMutationCoordinator;
use crate::blob::FsBlobStore;
use crate::events::{ArticleEvent, Notifier};
use crate::store::{articles, users, versions, Database, StoreConfig};
use crate::types::{Article, ArticleVersion, UploadedFile, User};

/// Collects every event it is handed
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ArticleEvent>>,
}

impl RecordingNotifier {
    pub fn take(&self) -> Vec<ArticleEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: ArticleEvent) {
        self.events.lock().push(event);
    }
}

/// Coordinator over a temp database and uploads dir, with one user
pub struct TestEnv {
    pub coordinator: ArticleMutationCoordinator,
    pub user_id: Uuid,
    pub events: Arc<RecordingNotifier>,
    _dir: TempDir,
}

pub fn test_coordinator() -> TestEnv {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(Database::open(StoreConfig::new(dir.path().join("test.db"))).unwrap());
    let blobs = Arc::new(FsBlobStore::open(dir.path().join("uploads")).unwrap());
    let user_id = seed_user(&db, "owner@example.com");
    let events = Arc::new(RecordingNotifier::default());

    let coordinator = ArticleMutationCoordinator::new(db, blobs).with_notifier(events.clone());
    TestEnv {
        coordinator,
        user_id,
        events,
        _dir: dir,
    }
}

/// Write a blob and describe it the way the upload intake would
pub fn upload(env: &TestEnv, stored_filename: &str, bytes: &[u8]) -> UploadedFile {
    env.coordinator.blobs().put(stored_filename, bytes).unwrap();
    UploadedFile {
        stored_filename: stored_filename.to_string(),
        original_name: stored_filename.to_string(),
        size_bytes: bytes.len() as u64,
    }
}

pub fn seed_user(db: &Database, email: &str) -> Uuid {
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: "x".to_string(),
        created_at: Utc::now(),
    };
    users::insert_user(&db.read().unwrap(), &user).unwrap();
    user.id
}

/// Insert an article with one snapshot per given version number
pub fn seed_article(db: &Database, user_id: Uuid, version_numbers: &[i64]) -> Uuid {
    let now = Utc::now();
    let article = Article {
        id: Uuid::new_v4(),
        title: "Seeded".to_string(),
        content: "Body".to_string(),
        attachments: Vec::new(),
        workspace_id: None,
        user_id,
        created_at: now,
        updated_at: now,
    };

    let conn = db.read().unwrap();
    articles::insert_article(&conn, &article).unwrap();
    for &n in version_numbers {
        versions::insert_version(&conn, &ArticleVersion::snapshot(&article, n, now)).unwrap();
    }
    article.id
}
