pub mod config;
pub mod error;
pub mod types;

pub use config::{DEFAULT_PROXY_URL, DEFAULT_TIMEOUT, HostConfig, ProxyConfig};
pub use error::ConfigError;
pub use types::{DEFAULT_LANGUAGE, MediaType};
