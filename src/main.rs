//! Rewriting Proxy
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                   REWRITING PROXY                    │
//!                 │                                                      │
//!  GET /proxy     │  ┌─────────┐    ┌──────────┐    ┌───────────────┐    │
//!  ───────────────┼─▶│  http   │───▶│  fetch   │───▶│ reqwest client│────┼───▶ Target
//!                 │  │handlers │    │ request  │    │ UA + Referer  │    │     site
//!                 │  └─────────┘    └──────────┘    └───────┬───────┘    │
//!                 │                                         │            │
//!                 │                           classify by Content-Type   │
//!                 │                          ┌──────────────┴─────────┐  │
//!                 │                          ▼                        ▼  │
//!  Response       │                  ┌──────────────┐      ┌───────────┐ │
//!  ◀──────────────┼──────────────────│   rewrite    │      │passthrough│ │
//!                 │                  │ (lol_html)   │      │  stream   │ │
//!                 │                  └──────────────┘      └───────────┘ │
//!                 └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rewriting_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use rewriting_proxy::lifecycle::{signals, Shutdown};
use rewriting_proxy::observability::{logging, metrics};
use rewriting_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "rewriting-proxy", version)]
#[command(about = "HTTP forward proxy that rewrites HTML links back through itself", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, replacing the port of `listener.bind_address`.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = ProxyConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };
    if let Some(port) = cli.port {
        config.listener.override_port(port)?;
    }

    logging::init(&config.observability);
    tracing::info!("rewriting-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.upstream.timeout_secs,
        max_redirects = config.upstream.max_redirects,
        banner = config.rewrite.banner,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
