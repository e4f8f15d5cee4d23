//! Integration tests for the article versioning core

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use article_vault::blob::{BlobStore, FsBlobStore};
use article_vault::store::{users, versions, Database, StoreConfig};
use article_vault::types::{ArticleDraft, UploadedFile, User};
use article_vault::versioning::AttachmentLedger;
use article_vault::{ArticleError, ArticleMutationCoordinator, ArticleResult, ErrorKind};

struct Fixture {
    coordinator: Arc<ArticleMutationCoordinator>,
    blobs: Arc<FsBlobStore>,
    user_id: Uuid,
    _dir: TempDir,
}

fn setup() -> Fixture {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(
        Database::open(StoreConfig::new(dir.path().join("articles.db")).with_pool_size(8)).unwrap(),
    );
    let blobs = Arc::new(FsBlobStore::open(dir.path().join("uploads")).unwrap());
    let user_id = add_user(&db, "writer@example.com");

    let coordinator = Arc::new(ArticleMutationCoordinator::new(db, blobs.clone()));
    Fixture {
        coordinator,
        blobs,
        user_id,
        _dir: dir,
    }
}

fn add_user(db: &Database, email: &str) -> Uuid {
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: "unused".to_string(),
        created_at: Utc::now(),
    };
    users::insert_user(&db.read().unwrap(), &user).unwrap();
    user.id
}

fn attach(fx: &Fixture, article_id: Uuid, filename: &str) -> ArticleResult<i64> {
    fx.blobs.put(filename, b"bytes").unwrap();
    let upload = UploadedFile {
        stored_filename: filename.to_string(),
        original_name: filename.to_string(),
        size_bytes: 5,
    };
    Ok(fx.coordinator.add_attachment(article_id, upload)?.version_number())
}

#[test]
fn test_full_lifecycle_scenario() {
    let fx = setup();
    let co = &fx.coordinator;

    let created = co
        .create_article(fx.user_id, ArticleDraft::new("Notes", "Draft"))
        .unwrap();
    let id = created.article.id;
    assert_eq!(created.version_number(), 1);

    let updated = co
        .update_article(id, fx.user_id, ArticleDraft::new("Notes", "Final"))
        .unwrap();
    assert_eq!(updated.version_number(), 2);

    assert_eq!(attach(&fx, id, "photo.png").unwrap(), 3);
    assert!(co.get_version(id, 3).unwrap().references("photo.png"));

    let removed = co.remove_attachment(id, "photo.png").unwrap();
    assert_eq!(removed.version_number(), 4);
    assert!(!removed.version.references("photo.png"));
    assert!(!fx.blobs.exists("photo.png"));

    // Earlier versions are untouched
    let v1 = co.get_version(id, 1).unwrap();
    assert_eq!((v1.title.as_str(), v1.content.as_str()), ("Notes", "Draft"));
    assert_eq!(co.get_version(id, 2).unwrap().content, "Final");

    let numbers: Vec<i64> = co
        .get_version_history(id)
        .unwrap()
        .iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(numbers, vec![4, 3, 2, 1]);
}

#[test]
fn test_concurrent_updates_on_one_article() {
    let fx = setup();
    let id = fx
        .coordinator
        .create_article(fx.user_id, ArticleDraft::new("Shared", "v1"))
        .unwrap()
        .article
        .id;

    const WRITERS: usize = 8;
    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let co = fx.coordinator.clone();
            let user = fx.user_id;
            thread::spawn(move || {
                co.update_article(id, user, ArticleDraft::new("Shared", format!("edit {}", i)))
                    .map(|rev| rev.version_number())
            })
        })
        .collect();

    let assigned: BTreeSet<i64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    let expected: BTreeSet<i64> = (2..=(WRITERS as i64 + 1)).collect();
    assert_eq!(assigned, expected);

    let stored: BTreeSet<i64> = fx
        .coordinator
        .get_version_history(id)
        .unwrap()
        .iter()
        .map(|v| v.version_number)
        .collect();
    assert_eq!(stored, (1..=(WRITERS as i64 + 1)).collect());
}

#[test]
fn test_two_simultaneous_updates_get_two_and_three() {
    let fx = setup();
    let id = fx
        .coordinator
        .create_article(fx.user_id, ArticleDraft::new("Race", "start"))
        .unwrap()
        .article
        .id;

    let barrier = Arc::new(std::sync::Barrier::new(2));
    let handles: Vec<_> = ["left", "right"]
        .into_iter()
        .map(|content| {
            let co = fx.coordinator.clone();
            let barrier = barrier.clone();
            let user = fx.user_id;
            thread::spawn(move || {
                barrier.wait();
                co.update_article(id, user, ArticleDraft::new("Race", content))
            })
        })
        .collect();

    let mut numbers: Vec<i64> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap().version_number())
        .collect();
    numbers.sort();
    assert_eq!(numbers, vec![2, 3]);
}

#[test]
fn test_concurrent_updates_on_different_articles() {
    let fx = setup();
    let ids: Vec<Uuid> = (0..4)
        .map(|i| {
            fx.coordinator
                .create_article(fx.user_id, ArticleDraft::new(format!("A{}", i), "body"))
                .unwrap()
                .article
                .id
        })
        .collect();

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let co = fx.coordinator.clone();
            let user = fx.user_id;
            thread::spawn(move || {
                (0..3)
                    .map(|n| {
                        co.update_article(id, user, ArticleDraft::new("A", format!("{}", n)))
                            .unwrap()
                            .version_number()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![2, 3, 4]);
    }
}

#[test]
fn test_orphan_safety_across_readd() {
    let fx = setup();
    let co = &fx.coordinator;
    let id = co
        .create_article(fx.user_id, ArticleDraft::new("Files", "body"))
        .unwrap()
        .article
        .id;

    // v2 has F, v3 drops it: nothing else references F, so it goes
    attach(&fx, id, "f.pdf").unwrap();
    co.remove_attachment(id, "f.pdf").unwrap();
    assert!(!fx.blobs.exists("f.pdf"));

    // v4 re-adds F; v2 and v4 now reference it
    attach(&fx, id, "f.pdf").unwrap();
    let conn = co.database().read().unwrap();
    assert!(AttachmentLedger
        .is_referenced_elsewhere(&conn, id, "f.pdf")
        .unwrap());
    drop(conn);

    // v5 drops it again, but v2 still lists it: the blob stays
    co.remove_attachment(id, "f.pdf").unwrap();
    assert!(fx.blobs.exists("f.pdf"));

    let err = co.remove_attachment(id, "f.pdf").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_article_cascades_everything() {
    let fx = setup();
    let co = &fx.coordinator;
    let id = co
        .create_article(fx.user_id, ArticleDraft::new("Doomed", "body"))
        .unwrap()
        .article
        .id;

    attach(&fx, id, "old.png").unwrap();
    co.remove_attachment(id, "old.png").unwrap();
    attach(&fx, id, "a.png").unwrap();
    attach(&fx, id, "b.gif").unwrap();

    co.delete_article(id).unwrap();

    for name in ["a.png", "b.gif"] {
        assert!(!fx.blobs.exists(name), "{} should be gone", name);
    }
    let conn = co.database().read().unwrap();
    assert!(versions::list_versions(&conn, id).unwrap().is_empty());
    drop(conn);

    assert_eq!(co.get_version(id, 1).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(co.get_article(id).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(co.delete_article(id).unwrap_err().kind(), ErrorKind::NotFound);
}

/// Blob store whose deletes always fail
struct StuckBlobs;

impl BlobStore for StuckBlobs {
    fn put(&self, _filename: &str, _bytes: &[u8]) -> ArticleResult<()> {
        Ok(())
    }

    fn delete(&self, filename: &str) -> ArticleResult<()> {
        Err(ArticleError::ResourceCleanupFailure {
            filename: filename.to_string(),
            reason: "device busy".to_string(),
        })
    }

    fn exists(&self, _filename: &str) -> bool {
        true
    }
}

#[test]
fn test_cleanup_failure_does_not_fail_mutation() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(Database::open(StoreConfig::new(dir.path().join("a.db"))).unwrap());
    let user = add_user(&db, "stuck@example.com");
    let co = ArticleMutationCoordinator::new(db, Arc::new(StuckBlobs));

    let id = co
        .create_article(user, ArticleDraft::new("Stuck", "body"))
        .unwrap()
        .article
        .id;
    let upload = UploadedFile {
        stored_filename: "1-x.png".to_string(),
        original_name: "x.png".to_string(),
        size_bytes: 1,
    };
    co.add_attachment(id, upload).unwrap();

    let removed = co.remove_attachment(id, "1-x.png").unwrap();
    assert_eq!(removed.version_number(), 3);
    assert!(removed.article.attachments.is_empty());

    co.delete_article(id).unwrap();
}

#[test]
fn test_validation_failures_touch_nothing() {
    let fx = setup();
    let long_title = "t".repeat(201);

    let err = fx
        .coordinator
        .create_article(fx.user_id, ArticleDraft::new(long_title, "body"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    let listed = fx
        .coordinator
        .list_articles(Default::default(), 1, 50)
        .unwrap();
    assert!(listed.is_empty());
}
