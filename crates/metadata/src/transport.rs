use std::time::Duration;

use tracing::debug;

use crate::ResolveFailure;

/// Performs the single GET a lookup needs.
///
/// The resolver is handed a transport instead of reaching for a global
/// client, so tests and embedders can substitute their own.
#[async_trait::async_trait]
pub trait ProxyTransport: Send + Sync {
    /// GET `url` with `params` as the query string and decode a JSON body.
    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<serde_json::Value, ResolveFailure>;
}

/// [`ProxyTransport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ProxyTransport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<serde_json::Value, ResolveFailure> {
        debug!(url = %url, ?params, "proxy request");

        let resp = self
            .client
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResolveFailure::Status(status.as_u16()));
        }

        resp.json().await.map_err(|e| classify(e, timeout))
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> ResolveFailure {
    if err.is_timeout() {
        ResolveFailure::Timeout(timeout)
    } else if err.is_decode() {
        ResolveFailure::Decode(err.to_string())
    } else {
        ResolveFailure::Network(err.to_string())
    }
}
