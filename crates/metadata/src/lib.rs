pub mod resolver;
pub mod tmdb;
pub mod transport;

use std::time::Duration;

use thiserror::Error;
use tmdbhook_core::{DEFAULT_LANGUAGE, MediaType};

pub use resolver::{MetadataProxyResolver, endpoint};
pub use transport::{HttpTransport, ProxyTransport};

/// Why an upstream lookup produced no record.
#[derive(Error, Debug)]
pub enum ResolveFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("cannot build upstream url: {0}")]
    InvalidUrl(String),
}

impl ResolveFailure {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Network(_) => "network",
            Self::Status(_) => "status",
            Self::Decode(_) => "decode",
            Self::InvalidUrl(_) => "url",
        }
    }
}

/// A single metadata lookup.
///
/// The id is always trimmed and the language never empty; both are only
/// set through the constructors below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRequest {
    media_type: MediaType,
    external_id: String,
    language: String,
}

impl MetadataRequest {
    pub fn new(media_type: MediaType, external_id: impl Into<String>) -> Self {
        Self {
            media_type,
            external_id: external_id.into().trim().to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// An empty language leaves the default in place.
    pub fn with_language(mut self, language: impl AsRef<str>) -> Self {
        let language = language.as_ref().trim();
        if !language.is_empty() {
            self.language = language.to_string();
        }
        self
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// Normalized lookup result. The empty record (`Default`) stands for
/// "no override available".
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetadataRecord {
    pub title: String,
    pub original_title: String,
    pub year: String,
    pub overview: String,
    pub poster_path: String,
    #[serde(rename = "tmdb_id")]
    pub external_id: String,
    pub language: String,
}

impl MetadataRecord {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
