use std::time::Duration;

use anyhow::{Context, bail};
use tmdbhook_core::{DEFAULT_PROXY_URL, HostConfig, MediaType, ProxyConfig};
use tmdbhook_plugin::TmdbHookPlugin;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tmdbhook-probe <movie|tv> <id> [language]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if std::env::var("TMDBHOOK_LOG_FORMAT").is_ok_and(|f| f == "json") {
        builder.json().init();
    } else {
        builder.init();
    }

    let mut args = std::env::args().skip(1);
    let (Some(media_type), Some(tmdb_id)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let language = args.next();
    if MediaType::parse(&media_type).is_none() {
        bail!("unsupported media type {media_type:?}; {USAGE}");
    }

    let enabled = match std::env::var("TMDBHOOK_ENABLED") {
        Ok(v) => parse_flag(&v).context("TMDBHOOK_ENABLED must be true or false")?,
        Err(_) => true,
    };
    let proxy_url =
        std::env::var("TMDBHOOK_PROXY_URL").unwrap_or_else(|_| DEFAULT_PROXY_URL.to_string());
    let timeout_secs: u64 = match std::env::var("TMDBHOOK_TIMEOUT_SECS") {
        Ok(v) => v
            .parse()
            .context("TMDBHOOK_TIMEOUT_SECS must be a whole number of seconds")?,
        Err(_) => 5,
    };

    let config = ProxyConfig::try_from(HostConfig {
        enabled: Some(enabled),
        proxy_url: Some(proxy_url),
    })
    .and_then(|c| c.with_timeout(Duration::from_secs(timeout_secs)))
    .context("invalid proxy configuration")?;
    info!(
        enabled = config.enabled(),
        proxy_url = %config.base_url(),
        timeout_secs,
        "probing proxy"
    );

    let plugin = TmdbHookPlugin::new();
    plugin.replace_config(config);

    let record = plugin
        .fetch_metadata(&media_type, &tmdb_id, language.as_deref())
        .await;
    println!("{}", serde_json::to_string_pretty(&record)?);

    plugin.stop_service();
    Ok(())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
