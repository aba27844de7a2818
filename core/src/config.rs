//! Client configuration from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `CINEREVIEW_API_URL` | `http://localhost:3000` |
//! | `CINEREVIEW_TIMEOUT_SECS` | unset, no timeout (`0` is rejected) |
//! | `CINEREVIEW_TOKEN_PATH` | unset, in-memory token |

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub const API_URL_VAR: &str = "CINEREVIEW_API_URL";
pub const TIMEOUT_VAR: &str = "CINEREVIEW_TIMEOUT_SECS";
pub const TOKEN_PATH_VAR: &str = "CINEREVIEW_TOKEN_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CINEREVIEW_API_URL must be an http(s) URL, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("CINEREVIEW_TIMEOUT_SECS must be a whole number of seconds, got {value:?}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("CINEREVIEW_TIMEOUT_SECS must be at least 1, unset it for no timeout")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request deadline. `None` lets a hung request hang.
    pub timeout: Option<Duration>,
    /// Where the session token is persisted. `None` keeps it in memory.
    pub token_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            token_path: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup(API_URL_VAR) {
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidBaseUrl(url));
                }
                url
            }
            None => {
                info!("{API_URL_VAR} not set, using default: {DEFAULT_BASE_URL}");
                DEFAULT_BASE_URL.to_string()
            }
        };

        let timeout = lookup(TIMEOUT_VAR)
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|source| ConfigError::InvalidTimeout { value, source })
            })
            .transpose()?;
        if timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }

        let token_path = lookup(TOKEN_PATH_VAR).map(PathBuf::from);
        if token_path.is_none() {
            info!("{TOKEN_PATH_VAR} not set, session token will not outlive the process");
        }

        Ok(Self {
            base_url,
            timeout,
            token_path,
        })
    }

    /// The token store this configuration asks for.
    pub fn token_store(&self) -> Arc<dyn TokenStore + Send + Sync> {
        match &self.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        }
    }
}
