//! Host-facing plugin shell.
//!
//! The host activates the plugin with its stored config mapping and calls
//! [`TmdbHookPlugin::fetch_metadata`] from its lookup path. Config is kept as
//! an immutable snapshot that is swapped wholesale on reconfiguration.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Value, json};
use tmdbhook_core::{ConfigError, DEFAULT_PROXY_URL, HostConfig, MediaType, ProxyConfig};
use tmdbhook_metadata::{MetadataProxyResolver, MetadataRecord, MetadataRequest};
use tracing::{debug, info, warn};

use crate::descriptor::{DESCRIPTOR, PluginDescriptor};

pub struct TmdbHookPlugin {
    config: RwLock<Arc<ProxyConfig>>,
    resolver: MetadataProxyResolver,
}

impl TmdbHookPlugin {
    pub fn new() -> Self {
        Self::with_resolver(MetadataProxyResolver::new())
    }

    pub fn with_resolver(resolver: MetadataProxyResolver) -> Self {
        Self {
            config: RwLock::new(Arc::new(ProxyConfig::default())),
            resolver,
        }
    }

    pub fn descriptor() -> &'static PluginDescriptor {
        &DESCRIPTOR
    }

    /// Config the host's settings form starts from.
    pub fn default_config() -> Value {
        json!({
            "enabled": false,
            "proxy_url": DEFAULT_PROXY_URL,
        })
    }

    /// Apply the host's config mapping. `None` keeps the current settings.
    /// A rejected mapping leaves the previous config active.
    pub fn init_plugin(&self, config: Option<&Value>) -> Result<(), ConfigError> {
        let Some(value) = config else {
            return Ok(());
        };

        let next = HostConfig::from_value(value)
            .and_then(ProxyConfig::try_from)
            .inspect_err(|e| warn!(field = ?e.field(), error = %e, "rejected plugin config"))?;

        info!(
            enabled = next.enabled(),
            proxy_url = %next.base_url(),
            "plugin configured"
        );
        self.replace_config(next);
        Ok(())
    }

    pub fn replace_config(&self, config: ProxyConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
    }

    /// Snapshot of the active config.
    pub fn config(&self) -> Arc<ProxyConfig> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get_state(&self) -> bool {
        self.config().enabled()
    }

    /// Look up override metadata for a host item.
    ///
    /// Always returns a record; unsupported media types, a disabled plugin
    /// and upstream failures all yield the empty record so the host falls
    /// back to its own source.
    pub async fn fetch_metadata(
        &self,
        media_type: &str,
        tmdb_id: &str,
        language: Option<&str>,
    ) -> MetadataRecord {
        let Some(media_type) = MediaType::parse(media_type) else {
            debug!(media_type, tmdb_id, "unsupported media type, lookup skipped");
            return MetadataRecord::default();
        };

        let mut request = MetadataRequest::new(media_type, tmdb_id);
        if let Some(language) = language {
            request = request.with_language(language);
        }

        let config = self.config();
        self.resolver.resolve(&config, &request).await
    }

    pub fn stop_service(&self) {
        debug!("plugin stopped");
    }
}

impl Default for TmdbHookPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tmdbhook_metadata::{ProxyTransport, ResolveFailure};

    use super::*;

    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ProxyTransport for CountingTransport {
        async fn get_json(
            &self,
            _url: &str,
            _params: &[(&str, &str)],
            _timeout: Duration,
        ) -> Result<Value, ResolveFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "locked_title": "Locked", "title": "Public" }))
        }
    }

    fn plugin_with_counter() -> (TmdbHookPlugin, Arc<CountingTransport>) {
        let transport = Arc::new(CountingTransport::default());
        let plugin =
            TmdbHookPlugin::with_resolver(MetadataProxyResolver::with_transport(transport.clone()));
        (plugin, transport)
    }

    #[test]
    fn starts_disabled_with_placeholder() {
        let plugin = TmdbHookPlugin::new();
        assert!(!plugin.get_state());
        assert_eq!(plugin.config().base_url(), DEFAULT_PROXY_URL);
    }

    #[test]
    fn default_config_matches_host_defaults() {
        let defaults = TmdbHookPlugin::default_config();
        assert_eq!(defaults["enabled"], false);
        assert_eq!(defaults["proxy_url"], "http://127.0.0.1:9000");

        let config = ProxyConfig::try_from(HostConfig::from_value(&defaults).unwrap()).unwrap();
        assert_eq!(config, ProxyConfig::default());
    }

    #[test]
    fn descriptor_values() {
        let d = TmdbHookPlugin::descriptor();
        assert_eq!(d.name, "tmdbhook");
        assert_eq!(d.config_prefix, "tmdbproxy_");
        assert_eq!(d.order, 10);
        assert_eq!(d.auth_level, 1);
    }

    #[test]
    fn init_plugin_applies_and_keeps_config() {
        let plugin = TmdbHookPlugin::new();

        plugin
            .init_plugin(Some(&json!({ "enabled": true, "proxy_url": "http://proxy:9000/" })))
            .unwrap();
        assert!(plugin.get_state());
        assert_eq!(plugin.config().base_url(), "http://proxy:9000");

        plugin.init_plugin(None).unwrap();
        assert!(plugin.get_state());

        let err = plugin
            .init_plugin(Some(&json!({ "enabled": true, "proxy_url": "proxy:9000" })))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProxyUrl(_)));
        assert_eq!(plugin.config().base_url(), "http://proxy:9000");

        let err = plugin.init_plugin(Some(&json!(["enabled"]))).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
        assert!(plugin.get_state());
    }

    #[test]
    fn snapshot_survives_reconfiguration() {
        let plugin = TmdbHookPlugin::new();
        plugin.replace_config(ProxyConfig::new(true, "http://a"));
        let before = plugin.config();

        plugin.replace_config(ProxyConfig::new(false, "http://b"));
        assert_eq!(before.base_url(), "http://a");
        assert_eq!(plugin.config().base_url(), "http://b");
    }

    #[tokio::test]
    async fn unsupported_media_type_makes_no_call() {
        let (plugin, transport) = plugin_with_counter();
        plugin.replace_config(ProxyConfig::new(true, "http://proxy"));

        for media_type in ["", "person", "collection"] {
            let record = plugin.fetch_metadata(media_type, "1", None).await;
            assert!(record.is_empty());
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);

        let record = plugin.fetch_metadata("MOVIE", "1", None).await;
        assert_eq!(record.title, "Locked");
        assert_eq!(record.language, "zh-CN");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_plugin_makes_no_call() {
        let (plugin, transport) = plugin_with_counter();

        let record = plugin.fetch_metadata("movie", "550", Some("en-US")).await;
        assert!(record.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }
}
