//! Create, update, attach, detach and delete

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ensure_workspace, load_article, ArticleMutationCoordinator};
use crate::error::{ArticleError, ArticleResult};
use crate::events::ArticleEvent;
use crate::store::articles;
use crate::types::{Article, ArticleDraft, ArticleRevision, UploadedFile};
use crate::validation::{validate_draft, validate_file_size, validate_stored_filename};

/// Insert the article row and version 1 in one transaction
pub fn create_article(
    co: &ArticleMutationCoordinator,
    user_id: Uuid,
    draft: ArticleDraft,
) -> ArticleResult<ArticleRevision> {
    let draft = validate_draft(draft)?;

    let tx = co.db.begin_write()?;
    ensure_workspace(&tx, draft.workspace_id)?;

    let now = Utc::now();
    let article = Article {
        id: Uuid::new_v4(),
        title: draft.title,
        content: draft.content,
        attachments: Vec::new(),
        workspace_id: draft.workspace_id,
        user_id,
        created_at: now,
        updated_at: now,
    };
    articles::insert_article(&tx, &article)?;
    let version = co.append_version(&tx, article.id)?;
    tx.commit()?;

    info!(article_id = %article.id, version = version.version_number, "article created");
    co.notifier.notify(ArticleEvent::ArticleCreated {
        article_id: article.id,
        title: article.title.clone(),
        version: version.version_number,
    });

    Ok(ArticleRevision { article, version })
}

/// Replace title, content and workspace; the updater becomes the owner of
/// the new version
pub fn update_article(
    co: &ArticleMutationCoordinator,
    article_id: Uuid,
    user_id: Uuid,
    draft: ArticleDraft,
) -> ArticleResult<ArticleRevision> {
    let draft = validate_draft(draft)?;

    let tx = co.db.begin_write()?;
    let mut article = load_article(&tx, article_id)?;
    ensure_workspace(&tx, draft.workspace_id)?;

    article.title = draft.title;
    article.content = draft.content;
    article.workspace_id = draft.workspace_id;
    article.user_id = user_id;
    article.updated_at = Utc::now();
    articles::update_article(&tx, &article)?;

    let version = co.append_version(&tx, article_id)?;
    tx.commit()?;

    info!(%article_id, version = version.version_number, "article updated");
    co.notifier.notify(ArticleEvent::ArticleUpdated {
        article_id,
        title: article.title.clone(),
        version: version.version_number,
    });

    Ok(ArticleRevision { article, version })
}

/// Append an already-stored upload to the attachment list
pub fn add_attachment(
    co: &ArticleMutationCoordinator,
    article_id: Uuid,
    upload: UploadedFile,
) -> ArticleResult<ArticleRevision> {
    validate_file_size(upload.size_bytes)?;
    validate_stored_filename(&upload.stored_filename)?;

    let tx = co.db.begin_write()?;
    let mut article = load_article(&tx, article_id)?;
    if article.has_attachment(&upload.stored_filename) {
        return Err(ArticleError::validation("Attachment already exists"));
    }

    let attachment = upload.into_attachment();
    let filename = attachment.filename.clone();
    article.attachments.push(attachment);
    article.updated_at = Utc::now();
    articles::update_article(&tx, &article)?;

    let version = co.append_version(&tx, article_id)?;
    tx.commit()?;

    info!(%article_id, %filename, version = version.version_number, "attachment added");
    co.notifier.notify(ArticleEvent::AttachmentAdded {
        article_id,
        filename,
        version: version.version_number,
    });

    Ok(ArticleRevision { article, version })
}

/// Drop an attachment and remove its blob once nothing in history needs it
///
/// The reference check reads the version history before the new version is
/// written. The blob is only touched after the transaction commits.
pub fn remove_attachment(
    co: &ArticleMutationCoordinator,
    article_id: Uuid,
    filename: &str,
) -> ArticleResult<ArticleRevision> {
    validate_stored_filename(filename)?;

    let tx = co.db.begin_write()?;
    let mut article = load_article(&tx, article_id)?;
    if !article.has_attachment(filename) {
        return Err(ArticleError::not_found("Attachment"));
    }

    let still_referenced = co.ledger.is_referenced_elsewhere(&tx, article_id, filename)?;

    article.attachments.retain(|a| a.filename != filename);
    article.updated_at = Utc::now();
    articles::update_article(&tx, &article)?;

    let version = co.append_version(&tx, article_id)?;
    tx.commit()?;

    info!(%article_id, filename, version = version.version_number, "attachment removed");
    if still_referenced {
        debug!(%article_id, filename, "blob kept, referenced by an older version");
    } else {
        co.release_blob(article_id, filename);
    }

    co.notifier.notify(ArticleEvent::AttachmentRemoved {
        article_id,
        filename: filename.to_string(),
        version: version.version_number,
    });

    Ok(ArticleRevision { article, version })
}

/// Delete the article (versions and comments cascade), then every blob it
/// or any of its versions referenced
pub fn delete_article(co: &ArticleMutationCoordinator, article_id: Uuid) -> ArticleResult<Article> {
    let tx = co.db.begin_write()?;
    let article = load_article(&tx, article_id)?;

    let mut filenames = co.ledger.referenced_filenames(&tx, article_id)?;
    filenames.extend(article.attachments.iter().map(|a| a.filename.clone()));

    articles::delete_article(&tx, article_id)?;
    tx.commit()?;

    info!(%article_id, blobs = filenames.len(), "article deleted");
    for filename in &filenames {
        co.release_blob(article_id, filename);
    }

    co.notifier.notify(ArticleEvent::ArticleDeleted { article_id });
    Ok(article)
}
