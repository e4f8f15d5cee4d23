//! Server configuration from environment variables
//!
//! | Variable                  | Default            |
//! |---------------------------|--------------------|
//! | `ARTICLE_DB_PATH`         | `data/articles.db` |
//! | `ARTICLE_UPLOADS_DIR`     | `uploads`          |
//! | `ARTICLE_BIND_ADDR`       | `127.0.0.1:3001`   |
//! | `ARTICLE_POOL_SIZE`       | `8`                |
//! | `ARTICLE_BUSY_TIMEOUT_MS` | `5000`             |
//! | `ARTICLE_CORS_ORIGIN`     | any origin         |
//! | `ARTICLE_JWT_SECRET`      | `.jwt_secret` file |
//! | `ARTICLE_TOKEN_TTL`       | `86400` seconds    |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::store::StoreConfig;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server binary needs to start
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub uploads_dir: PathBuf,
    pub bind_addr: SocketAddr,
    /// Allowed CORS origin; `None` allows any
    pub cors_origin: Option<String>,
    /// Signing secret; `None` falls back to `jwt_secret_file`
    pub jwt_secret: Option<String>,
    pub jwt_secret_file: PathBuf,
    /// Token lifetime in seconds
    pub token_ttl: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            uploads_dir: PathBuf::from("uploads"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            cors_origin: None,
            jwt_secret: None,
            jwt_secret_file: PathBuf::from(".jwt_secret"),
            token_ttl: 86_400,
        }
    }
}

impl AppConfig {
    /// Create from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup, falling back to defaults for absent keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("ARTICLE_DB_PATH") {
            config.store.path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("ARTICLE_UPLOADS_DIR") {
            config.uploads_dir = PathBuf::from(dir);
        }
        if let Some(addr) = parsed(&lookup, "ARTICLE_BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(size) = parsed::<usize, _>(&lookup, "ARTICLE_POOL_SIZE")? {
            config.store = config.store.with_pool_size(size);
        }
        if let Some(ms) = parsed::<u64, _>(&lookup, "ARTICLE_BUSY_TIMEOUT_MS")? {
            config.store = config.store.with_busy_timeout(Duration::from_millis(ms));
        }
        config.cors_origin = lookup("ARTICLE_CORS_ORIGIN").filter(|o| !o.is_empty() && o != "*");
        config.jwt_secret = lookup("ARTICLE_JWT_SECRET").filter(|s| !s.is_empty());
        if let Some(ttl) = parsed(&lookup, "ARTICLE_TOKEN_TTL")? {
            config.token_ttl = ttl;
        }

        Ok(config)
    }

    pub fn with_database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.store.path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_uploads_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.uploads_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }
}

fn parsed<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store.path, PathBuf::from("data/articles.db"));
        assert_eq!(config.store.pool_size, 8);
        assert_eq!(config.bind_addr.port(), 3001);
        assert_eq!(config.token_ttl, 86_400);
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ARTICLE_DB_PATH", "/tmp/a.db"),
            ("ARTICLE_POOL_SIZE", "2"),
            ("ARTICLE_BUSY_TIMEOUT_MS", "250"),
            ("ARTICLE_BIND_ADDR", "0.0.0.0:8080"),
            ("ARTICLE_CORS_ORIGIN", "http://localhost:5173"),
        ]))
        .unwrap();

        assert_eq!(config.store.path, PathBuf::from("/tmp/a.db"));
        assert_eq!(config.store.pool_size, 2);
        assert_eq!(config.store.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = AppConfig::from_lookup(lookup(&[("ARTICLE_POOL_SIZE", "lots")])).unwrap_err();
        assert!(err.to_string().contains("ARTICLE_POOL_SIZE"));
    }
}
