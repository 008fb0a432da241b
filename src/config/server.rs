use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Secret used when nothing else is configured. Only suitable for local development.
pub const DEFAULT_JWT_SECRET: &str = "secret";

const JWT_SECRET_ENV: &str = "JWT_SECRET";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Shared secret for verifying bearer credentials.
    pub jwt_secret: Option<String>,
    /// Upper bound for JSON request bodies.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Reads a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Fills `jwt_secret` from the environment when the file did not set it.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if self.jwt_secret.is_none() {
            self.jwt_secret = std::env::var(JWT_SECRET_ENV).ok().filter(|s| !s.is_empty());
        }
        self
    }

    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("cipherstudio.db")
    }

    /// The configured secret, or the development default with a warning.
    #[must_use]
    pub fn secret(&self) -> String {
        match &self.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!(
                    "No JWT secret configured; falling back to the insecure development default"
                );
                DEFAULT_JWT_SECRET.to_string()
            }
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_dir: PathBuf::from("./data"),
            jwt_secret: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cipherstudio.toml");
        std::fs::write(&path, "port = 7000\njwt_secret = \"s3cret\"\n").unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_load_rejects_bad_types() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "port = \"not a number\"\n").unwrap();

        assert!(matches!(ServerConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_db_path_lives_in_data_dir() {
        let config = ServerConfig {
            data_dir: PathBuf::from("/tmp/cs"),
            ..ServerConfig::default()
        };
        assert_eq!(config.db_path(), PathBuf::from("/tmp/cs/cipherstudio.db"));
        assert_eq!(config.socket_addr().unwrap().port(), 5000);
    }
}
