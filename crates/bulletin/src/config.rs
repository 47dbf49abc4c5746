//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use bulletin_session::DEFAULT_STORAGE_KEY;

use crate::{CachePolicy, ClientError};

/// Environment variable holding the API base URL.
pub const ENV_BASE_URL: &str = "BULLETIN_API_BASE_URL";
/// Environment variable holding the session storage directory.
pub const ENV_STORAGE_DIR: &str = "BULLETIN_STORAGE_DIR";
/// Environment variable holding the session storage key.
pub const ENV_STORAGE_KEY: &str = "BULLETIN_STORAGE_KEY";
/// Environment variable holding the request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "BULLETIN_TIMEOUT_SECS";

/// Where the API lives and where the session is kept.
///
/// Start from `ClientConfig::default()` or [`ClientConfig::from_env`] and
/// override the fields you care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every API path is appended to.
    pub base_url: String,

    /// Directory the session record is written into.
    pub storage_dir: PathBuf,

    /// Name of the session record inside `storage_dir`.
    pub storage_key: String,

    /// Per-request timeout. A timed-out request counts as a network
    /// failure, so it goes through the refresh path like a 401.
    pub timeout: Duration,

    /// How long board reads are answered from memory.
    pub cache: CachePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            storage_dir: PathBuf::from(".bulletin"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            timeout: Duration::from_secs(30),
            cache: CachePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if a variable is set but empty, or
    /// if the timeout is not a positive whole number of seconds.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(url) = non_empty(&lookup, ENV_BASE_URL)? {
            config.base_url = url;
        }
        if let Some(dir) = non_empty(&lookup, ENV_STORAGE_DIR)? {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Some(key) = non_empty(&lookup, ENV_STORAGE_KEY)? {
            config.storage_key = key;
        }
        if let Some(secs) = non_empty(&lookup, ENV_TIMEOUT_SECS)? {
            let secs: u64 = secs
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    ClientError::Config(format!(
                        "{ENV_TIMEOUT_SECS} must be a positive number of seconds, got {secs:?}"
                    ))
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<String>, ClientError> {
    match lookup(name) {
        Some(value) if value.trim().is_empty() => {
            Err(ClientError::Config(format!("{name} is set but empty")))
        }
        other => Ok(other),
    }
}
