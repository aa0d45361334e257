use thiserror::Error;

/// Rejected plugin configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed plugin config: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid proxy_url {0:?}: expected http(s)://host[:port][/path]")]
    InvalidProxyUrl(String),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

impl ConfigError {
    /// Name of the offending config key, for host-side form feedback.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Malformed(_) => None,
            Self::InvalidProxyUrl(_) => Some("proxy_url"),
            Self::ZeroTimeout => Some("timeout"),
        }
    }
}
