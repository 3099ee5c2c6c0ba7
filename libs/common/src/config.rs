//! Client configuration
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `BLOG_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::{ClientError, ClientResult};

/// Base URL used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Well-known key the bearer credential is stored under
pub const DEFAULT_STORAGE_KEY: &str = "token";

/// Configuration for the blog client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the blog API (e.g., "http://localhost:8000")
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// File holding the persisted credential
    #[serde(default)]
    pub credential_path: Option<PathBuf>,
    /// Key the credential is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Per-request timeout, no timeout when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            credential_path: None,
            storage_key: default_storage_key(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BLOG_API_BASE_URL`: API base URL (default: "http://localhost:8000")
    /// - `BLOG_CREDENTIAL_PATH`: credential file (default: "<config dir>/blog-client/credentials.json")
    /// - `BLOG_STORAGE_KEY`: credential storage key (default: "token")
    /// - `BLOG_REQUEST_TIMEOUT_SECS`: request timeout in seconds (default: none)
    pub fn from_env() -> ClientResult<Self> {
        Self::load(None)
    }

    /// Load configuration from an optional TOML file, overridden by the environment.
    pub fn load(file: Option<&Path>) -> ClientResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("BLOG").try_parsing(true))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let mut config: ClientConfig = settings
            .try_deserialize()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();

        if config.api_base_url.is_empty() {
            return Err(ClientError::Configuration(
                "api_base_url must not be empty".to_string(),
            ));
        }

        info!("Client configured for API at {}", config.api_base_url);
        Ok(config)
    }

    /// Path of the credential file, falling back to the user's config directory
    pub fn credential_path(&self) -> PathBuf {
        self.credential_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("blog-client")
                .join("credentials.json")
        })
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
