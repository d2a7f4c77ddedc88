//! Configuration for the external search and verification services.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{Result, ScoutError};

/// Environment variable holding the search endpoint URL.
pub const ENV_SEARCH_ENDPOINT: &str = "STORESCOUT_SEARCH_ENDPOINT";
/// Environment variable holding the verify endpoint URL.
pub const ENV_VERIFY_ENDPOINT: &str = "STORESCOUT_VERIFY_ENDPOINT";
/// Environment variable holding the bearer token.
pub const ENV_API_TOKEN: &str = "STORESCOUT_API_TOKEN";
/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECONDS: &str = "STORESCOUT_TIMEOUT_SECONDS";
/// Environment variable holding the page limit per run.
pub const ENV_MAX_PAGES: &str = "STORESCOUT_MAX_PAGES";
/// Environment variable overriding the user agent.
pub const ENV_USER_AGENT: &str = "STORESCOUT_USER_AGENT";

/// Configuration shared by the HTTP client and the search controller.
#[derive(Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// URL of the paged store search endpoint.
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,
    /// URL of the single-site verification endpoint.
    #[serde(default = "default_verify_endpoint")]
    pub verify_endpoint: String,
    /// Static bearer credential sent to both services.
    #[serde(default)]
    pub api_token: String,
    /// Per-request timeout in seconds. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_seconds: Option<f64>,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pages fetched per run before pausing with more available.
    #[serde(default)]
    pub max_pages_per_run: Option<u32>,
    /// Logo used for results that arrive without one.
    #[serde(default = "default_logo_placeholder")]
    pub logo_placeholder: String,
}

fn default_search_endpoint() -> String {
    "https://api.magistral.ai/search".to_string()
}

fn default_verify_endpoint() -> String {
    "https://api.magistral.ai/analyze".to_string()
}

fn default_user_agent() -> String {
    concat!("storescout/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_logo_placeholder() -> String {
    "logo_plugilo_black.svg".to_string()
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_search_endpoint(),
            verify_endpoint: default_verify_endpoint(),
            api_token: String::new(),
            timeout_seconds: None,
            user_agent: default_user_agent(),
            max_pages_per_run: None,
            logo_placeholder: default_logo_placeholder(),
        }
    }
}

impl std::fmt::Debug for ScoutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoutConfig")
            .field("search_endpoint", &self.search_endpoint)
            .field("verify_endpoint", &self.verify_endpoint)
            .field("api_token", &redact(&self.api_token))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .field("max_pages_per_run", &self.max_pages_per_run)
            .field("logo_placeholder", &self.logo_placeholder)
            .finish()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl ScoutConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from `STORESCOUT_*` environment variables.
    ///
    /// Unset variables keep their defaults. Numeric variables that fail to
    /// parse are reported as [`ScoutError::Config`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_SEARCH_ENDPOINT) {
            config.search_endpoint = v;
        }
        if let Some(v) = get(ENV_VERIFY_ENDPOINT) {
            config.verify_endpoint = v;
        }
        if let Some(v) = get(ENV_API_TOKEN) {
            config.api_token = v;
        }
        if let Some(v) = get(ENV_USER_AGENT) {
            config.user_agent = v;
        }
        if let Some(v) = get(ENV_TIMEOUT_SECONDS) {
            let seconds = v.trim().parse::<f64>().map_err(|_| {
                ScoutError::Config(format!("{ENV_TIMEOUT_SECONDS} is not a number: {v}"))
            })?;
            config.timeout_seconds = Some(seconds);
        }
        if let Some(v) = get(ENV_MAX_PAGES) {
            let pages = v.trim().parse::<u32>().map_err(|_| {
                ScoutError::Config(format!("{ENV_MAX_PAGES} is not a page count: {v}"))
            })?;
            config.max_pages_per_run = Some(pages);
        }

        Ok(config)
    }

    /// Sets the search endpoint.
    #[must_use]
    pub fn with_search_endpoint(mut self, url: impl Into<String>) -> Self {
        self.search_endpoint = url.into();
        self
    }

    /// Sets the verify endpoint.
    #[must_use]
    pub fn with_verify_endpoint(mut self, url: impl Into<String>) -> Self {
        self.verify_endpoint = url.into();
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Sets the page limit per run.
    #[must_use]
    pub fn with_max_pages_per_run(mut self, pages: u32) -> Self {
        self.max_pages_per_run = Some(pages);
        self
    }

    /// Sets the logo placeholder.
    #[must_use]
    pub fn with_logo_placeholder(mut self, logo: impl Into<String>) -> Self {
        self.logo_placeholder = logo.into();
        self
    }

    /// Gets the timeout as a Duration, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }

    /// Checks that the settings needed to reach the services are present.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(ScoutError::Config(format!("{ENV_API_TOKEN} is not set")));
        }
        for (name, url) in [
            ("search endpoint", &self.search_endpoint),
            ("verify endpoint", &self.verify_endpoint),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ScoutError::Config(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if let Some(seconds) = self.timeout_seconds {
            if seconds > 0.0 && Duration::try_from_secs_f64(seconds).is_err() {
                return Err(ScoutError::Config(format!(
                    "timeout of {seconds} seconds is out of range"
                )));
            }
        }
        if self.max_pages_per_run == Some(0) {
            return Err(ScoutError::Config(
                "max pages per run must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
