//! Account and identifier checks

use uuid::Uuid;

use crate::error::{ArticleError, ArticleResult};

/// Minimum password length for registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Loose `local@domain.tld` shape check without whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

pub fn validate_credentials(email: &str, password: &str) -> ArticleResult<()> {
    if email.is_empty() || password.is_empty() {
        return Err(ArticleError::validation("Email and password are required"));
    }
    if !is_valid_email(email) {
        return Err(ArticleError::validation("Invalid email format"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ArticleError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Parse a path identifier, failing with the given message
pub fn parse_id(raw: &str, message: &str) -> ArticleResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ArticleError::validation(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("alice example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_credentials("a@b.io", "short").is_err());
        assert!(validate_credentials("a@b.io", "long-enough").is_ok());
    }

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "bad").unwrap(), id);
        let err = parse_id("not-a-uuid", "Invalid article ID format").unwrap_err();
        assert_eq!(err.to_string(), "Invalid article ID format");
    }
}
