//! Title, content and comment constraints

use crate::error::{ArticleError, ArticleResult};
use crate::types::ArticleDraft;

/// Maximum title length in characters (after trimming)
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum content length in characters (after trimming)
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Collect every violated constraint for a title/content pair
pub fn article_errors(title: &str, content: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let title = title.trim();
    if title.is_empty() {
        errors.push("Title is required".to_string());
    } else if title.chars().count() > MAX_TITLE_LENGTH {
        errors.push(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        ));
    }

    let content = content.trim();
    if content.is_empty() {
        errors.push("Content is required".to_string());
    } else if content.chars().count() > MAX_CONTENT_LENGTH {
        errors.push(format!(
            "Content must be at most {} characters",
            MAX_CONTENT_LENGTH
        ));
    }

    errors
}

/// Validate a draft and return it with title and content trimmed
///
/// Fails with the first violated constraint.
pub fn validate_draft(draft: ArticleDraft) -> ArticleResult<ArticleDraft> {
    if let Some(first) = article_errors(&draft.title, &draft.content).into_iter().next() {
        return Err(ArticleError::ValidationFailed(first));
    }

    Ok(ArticleDraft {
        title: draft.title.trim().to_string(),
        content: draft.content.trim().to_string(),
        workspace_id: draft.workspace_id,
    })
}

/// Validate comment text and return it trimmed
pub fn validate_comment(content: &str) -> ArticleResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ArticleError::validation("Comment content is required"));
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_article() {
        assert!(article_errors("Notes", "Draft").is_empty());
    }

    #[test]
    fn test_blank_fields_are_required() {
        let errors = article_errors("   ", "");
        assert_eq!(errors, vec!["Title is required", "Content is required"]);
    }

    #[test]
    fn test_title_length_counts_characters() {
        let exact = "\u{e9}".repeat(MAX_TITLE_LENGTH);
        assert!(article_errors(&exact, "body").is_empty());

        let too_long = "a".repeat(MAX_TITLE_LENGTH + 1);
        let errors = article_errors(&too_long, "body");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Title must be at most"));
    }

    #[test]
    fn test_content_too_long() {
        let content = "x".repeat(MAX_CONTENT_LENGTH + 1);
        let errors = article_errors("Title", &content);
        assert!(errors[0].contains("Content must be at most"));
    }

    #[test]
    fn test_validate_draft_trims() {
        let draft = validate_draft(ArticleDraft::new("  Notes ", "\nDraft\t")).unwrap();
        assert_eq!(draft.title, "Notes");
        assert_eq!(draft.content, "Draft");
    }

    #[test]
    fn test_validate_draft_reports_first_error() {
        let err = validate_draft(ArticleDraft::new("", "")).unwrap_err();
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn test_validate_comment() {
        assert_eq!(validate_comment("  nice ").unwrap(), "nice");
        assert!(validate_comment("   ").is_err());
    }
}
