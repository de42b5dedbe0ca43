use std::path::PathBuf;

use clap::Parser;

use forward_proxy::config::{read_config, validate_config, ConfigError, ProxyConfig};
use forward_proxy::lifecycle::{signals, startup, Shutdown};
use forward_proxy::observability::{logging, metrics};
use forward_proxy::HttpServer;

/// Forward prefixed HTTP requests to a fixed upstream, with CORS, a health
/// endpoint and optional static file serving.
#[derive(Parser, Debug)]
#[command(name = "forward-proxy", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:8001.
    #[arg(long)]
    bind: Option<String>,

    /// Listen port on the configured host.
    #[arg(short, long, conflicts_with = "bind")]
    port: Option<u16>,

    /// Upstream base URL, e.g. http://localhost:3000.
    #[arg(short, long)]
    upstream: Option<String>,

    /// Directory served for paths outside the proxy prefix.
    #[arg(long)]
    document_root: Option<PathBuf>,

    /// Disable static file serving.
    #[arg(long)]
    no_static: bool,
}

impl Cli {
    /// File settings, then flag overrides, then validation of the result.
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(port) = self.port {
            let host = config
                .listener
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "127.0.0.1".to_string());
            config.listener.bind_address = format!("{}:{}", host, port);
        }
        if let Some(upstream) = self.upstream {
            config.upstream.base_url = upstream;
        }
        if let Some(root) = self.document_root {
            config.static_files.document_root = root;
        }
        if self.no_static {
            config.static_files.enabled = false;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);
    tracing::info!("forward-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        path_prefix = %config.upstream.path_prefix,
        document_root = %config.static_files.document_root.display(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = startup::bind(&config.listener).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            let reason = signals::wait_for_termination().await;
            tracing::info!(reason = reason.as_str(), "Termination signal received");
            shutdown.trigger_with(reason);
        }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
