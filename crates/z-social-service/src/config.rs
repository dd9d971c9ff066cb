//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Default upload limit for profile pictures (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/z-social").
    pub data_dir: String,

    /// Directory holding uploaded profile pictures (default: "/data/z-social/uploads").
    pub upload_dir: String,

    /// HMAC secret used to sign session tokens.
    pub secret_key: String,

    /// Session token lifetime in seconds.
    pub token_ttl_seconds: u64,

    /// Maximum profile picture size in bytes.
    pub max_upload_bytes: usize,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum JSON request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Whether new accounts automatically follow the first account.
    pub auto_follow_first_account: bool,
}

/// Session secrets file structure.
#[derive(Debug, Deserialize)]
struct SessionSecrets {
    secret_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/z-social".into());
        let upload_dir =
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| format!("{data_dir}/uploads"));

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir,
            upload_dir,
            secret_key: load_secret_key(),
            token_ttl_seconds: env_parse("TOKEN_TTL_SECONDS").unwrap_or(24 * 60 * 60),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: env_parse("REQUEST_TIMEOUT_SECONDS").unwrap_or(30),
            auto_follow_first_account: std::env::var("AUTO_FOLLOW_FIRST_ACCOUNT")
                .map_or(true, |v| parse_flag(&v)),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Load the token signing secret from file or environment.
///
/// Without either, a random secret is generated; tokens then stop validating
/// after a restart.
fn load_secret_key() -> String {
    let secret_paths = [
        ".secrets/session.json",
        "z-social/.secrets/session.json",
        "../.secrets/session.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<SessionSecrets>(path) {
            tracing::info!(path = %path, "Loaded session secret from file");
            return secrets.secret_key;
        }
    }

    if let Ok(key) = std::env::var("SECRET_KEY") {
        if !key.is_empty() {
            return key;
        }
    }

    tracing::warn!("SECRET_KEY not configured - generated an ephemeral signing key");
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/z-social".into(),
            upload_dir: "/data/z-social/uploads".into(),
            secret_key: String::new(),
            token_ttl_seconds: 24 * 60 * 60,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            auto_follow_first_account: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn default_upload_limit_is_five_mib() {
        assert_eq!(ServiceConfig::default().max_upload_bytes, 5_242_880);
    }
}
