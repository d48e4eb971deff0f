//! Configuration management.
//!
//! Holds the endpoint defaults for the Metaphor API and the [`ClientConfig`]
//! a [`Client`](crate::Client) is built from. Configuration can be layered
//! from a TOML file and `METAPHOR_*` environment variables with [`load_config`].
//!
//! ```toml
//! api_key = "your-api-key"
//! base_url = "https://api.metaphor.systems"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientError;

/// Default number of results requested from `/search` and `/findSimilar`
pub const DEFAULT_NUM_RESULTS: u32 = 10;

/// Default autoprompt flag
pub const DEFAULT_AUTOPROMPT: bool = false;

/// Root of the Metaphor API
pub const DEFAULT_BASE_URL: &str = "https://api.metaphor.systems";

/// Search endpoint
pub const SEARCH_PATH: &str = "/search";

/// Find-similar endpoint
pub const FIND_SIMILAR_PATH: &str = "/findSimilar";

/// Contents endpoint
pub const CONTENTS_PATH: &str = "/contents";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "METAPHOR";

/// File name searched for by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "metaphor.toml";

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent as `x-api-key`
    #[serde(default)]
    pub api_key: String,

    /// Service root, without a trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    /// Create a configuration for the given API key with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the service root
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the whole-request timeout.
    ///
    /// Stored in whole seconds; a fractional second rounds up, so a non-zero
    /// duration never becomes zero. Use a [`CallContext`](crate::CallContext)
    /// deadline for sub-second limits.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whole-request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout as a `Duration`
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Check the configuration and produce the endpoint it describes
    pub fn validate(&self) -> Result<Endpoint, ClientError> {
        if self.timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "connect_timeout_secs must be at least 1".to_string(),
            ));
        }
        Endpoint::new(&self.base_url, &self.api_key)
    }
}

/// Where requests go and how they authenticate.
///
/// Fixed for the lifetime of a client; a different base URL requires an
/// explicit [`Client::with_base_url`](crate::Client::with_base_url).
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    api_key: String,
}

impl Endpoint {
    /// Create an endpoint, rejecting an empty API key or an unparsable base URL
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        if api_key.is_empty() {
            return Err(ClientError::Configuration(
                "missing the Metaphor API key, set it as the METAPHOR_API_KEY environment variable"
                    .to_string(),
            ));
        }

        url::Url::parse(base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base URL {:?}: {}", base_url, e))
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Service root without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Load configuration from an optional file, overlaid with `METAPHOR_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("metaphor").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}
