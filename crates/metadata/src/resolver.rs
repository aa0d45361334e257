use std::sync::Arc;

use tmdbhook_core::ProxyConfig;
use tracing::{debug, error};

use crate::transport::{HttpTransport, ProxyTransport};
use crate::{MetadataRecord, MetadataRequest, ResolveFailure, tmdb};

/// Resolves metadata through the configured proxy, preferring locked fields.
///
/// Holds no state besides the transport; the config is passed per call so a
/// reconfiguration never affects a lookup already in flight.
#[derive(Clone)]
pub struct MetadataProxyResolver {
    transport: Arc<dyn ProxyTransport>,
}

impl MetadataProxyResolver {
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn ProxyTransport>) -> Self {
        Self { transport }
    }

    /// Look up `request`, returning the empty record when the proxy is
    /// disabled, input is missing, or the upstream call fails. Failures are
    /// logged once; nothing is returned to the caller as an error.
    pub async fn resolve(
        &self,
        config: &ProxyConfig,
        request: &MetadataRequest,
    ) -> MetadataRecord {
        if !config.enabled() || config.base_url().is_empty() || request.external_id().is_empty()
        {
            debug!(
                enabled = config.enabled(),
                media_type = %request.media_type(),
                external_id = %request.external_id(),
                "proxy lookup skipped"
            );
            return MetadataRecord::default();
        }

        match self.fetch_record(config, request).await {
            Ok(record) => record,
            Err(failure) => {
                let url = endpoint(config, request)
                    .map(String::from)
                    .unwrap_or_default();
                error!(
                    url = %url,
                    external_id = %request.external_id(),
                    language = %request.language(),
                    kind = failure.kind(),
                    error = %failure,
                    "proxy metadata lookup failed"
                );
                MetadataRecord::default()
            }
        }
    }

    /// Perform the upstream call without the short-circuit checks and keep
    /// the failure reason.
    pub async fn fetch_record(
        &self,
        config: &ProxyConfig,
        request: &MetadataRequest,
    ) -> Result<MetadataRecord, ResolveFailure> {
        let url = endpoint(config, request)?;
        let data = self
            .transport
            .get_json(
                url.as_str(),
                &[("language", request.language())],
                config.timeout(),
            )
            .await?;
        tmdb::record_from_json(&data, request)
    }
}

impl Default for MetadataProxyResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Upstream object URL, `{base_url}/3/{media_type}/{external_id}`.
///
/// The id is percent-encoded as one path segment, so `/`, `?` and `#` in it
/// can never change the path or add query parameters.
pub fn endpoint(
    config: &ProxyConfig,
    request: &MetadataRequest,
) -> Result<reqwest::Url, ResolveFailure> {
    let external_id = request.external_id();
    // Dot segments would be dropped from the path rather than encoded.
    if matches!(external_id, "." | "..") {
        return Err(ResolveFailure::InvalidUrl(format!(
            "unusable id {external_id:?}"
        )));
    }

    let base = config.base_url();
    let mut url = reqwest::Url::parse(base)
        .map_err(|e| ResolveFailure::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ResolveFailure::InvalidUrl(format!("{base} cannot be a base url")))?
        .pop_if_empty()
        .extend(["3", request.media_type().as_str(), external_id]);
    Ok(url)
}
