//! Proxy configuration.
//!
//! The host hands the plugin a loose JSON mapping (`enabled`, `proxy_url`).
//! It is parsed into [`HostConfig`] and validated into an immutable
//! [`ProxyConfig`], which is what every lookup reads.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

/// Placeholder address offered to operators before they configure a proxy.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:9000";

/// Upper bound on a single upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

static PROXY_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/\s?#]+(/[^\s?#]*)?$").unwrap());

/// Validated, immutable settings for one or more lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    enabled: bool,
    base_url: String,
    timeout: Duration,
}

impl ProxyConfig {
    /// Trailing slashes are stripped here so request paths never double up.
    pub fn new(enabled: bool, base_url: impl AsRef<str>) -> Self {
        Self {
            enabled,
            base_url: normalize_base_url(base_url.as_ref()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// True when lookups would actually reach the network.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.base_url.is_empty()
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(false, DEFAULT_PROXY_URL)
    }
}

impl TryFrom<HostConfig> for ProxyConfig {
    type Error = ConfigError;

    fn try_from(host: HostConfig) -> Result<Self, Self::Error> {
        let base_url = normalize_base_url(host.proxy_url.as_deref().unwrap_or_default());
        if !base_url.is_empty() && !PROXY_URL_RE.is_match(&base_url) {
            return Err(ConfigError::InvalidProxyUrl(base_url));
        }
        Ok(Self::new(host.enabled.unwrap_or(false), base_url))
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Plugin config mapping exactly as the host stores it.
///
/// Missing keys take their defaults; an explicit `null` means "unset"
/// (disabled, or no proxy URL).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_enabled")]
    pub enabled: Option<bool>,
    #[serde(default = "default_proxy_url")]
    pub proxy_url: Option<String>,
}

impl HostConfig {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        Ok(Self::deserialize(value)?)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            proxy_url: default_proxy_url(),
        }
    }
}

fn default_enabled() -> Option<bool> {
    Some(false)
}

fn default_proxy_url() -> Option<String> {
    Some(DEFAULT_PROXY_URL.to_string())
}
