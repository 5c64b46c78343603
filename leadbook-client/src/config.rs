//! Configuration loading for the Leadbook client.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use leadbook_storage::StoreEndpoint;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub store_url: String,
    pub auth: AuthConfig,
    /// Optional. No timeout is applied when unset.
    pub request_timeout_ms: Option<u64>,
    pub session_path: PathBuf,
    pub known_users: Vec<String>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub api_key: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or LEADBOOK_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ClientConfig {
    /// Load from the explicit path, falling back to `LEADBOOK_CONFIG`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.store_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "store_url",
                reason: "must be an http or https URL".to_string(),
            });
        }
        if self.auth.api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.api_key",
                reason: "must not be empty".to_string(),
            });
        }
        if matches!(self.auth.access_token.as_deref(), Some(token) if token.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "auth.access_token",
                reason: "must not be empty when set".to_string(),
            });
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0 when set".to_string(),
            });
        }
        if self.session_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.known_users.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "known_users",
                reason: "must list at least one user".to_string(),
            });
        }
        if self.known_users.iter().any(|user| user.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "known_users",
                reason: "user names must not be blank".to_string(),
            });
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.filter",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn endpoint(&self) -> StoreEndpoint {
        StoreEndpoint {
            url: self.store_url.trim().to_string(),
            api_key: self.auth.api_key.clone(),
            access_token: self.auth.access_token.clone(),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("LEADBOOK_CONFIG").ok().map(PathBuf::from)
}
