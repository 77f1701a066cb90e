//! Stream forwarder.
//!
//! ```text
//!   Client                       stream-forwarder                         Upstream
//!     │  OPTIONS /…                  │                                        │
//!     │ ───────────────────────────▶ │ 204 + CORS                             │
//!     │  GET /…?id=445               │                                        │
//!     │ ───────────────────────────▶ │ GET <base>/stream-445.php?<flags>      │
//!     │                              │ Referer / User-Agent fixed            │
//!     │                              │ ─────────────────────────────────────▶ │
//!     │                              │ ◀───────────────────────────────────── │
//!     │ ◀─────────────────────────── │ status, headers minus XFO/CSP, CORS,   │
//!     │                              │ content-type policy, streamed body     │
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use stream_forwarder::config::{CliArgs, ConfigWatcher, ForwarderConfig};
use stream_forwarder::http::HttpServer;
use stream_forwarder::lifecycle::Shutdown;
use stream_forwarder::net::tls::load_tls_config;
use stream_forwarder::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // The file as written seeds the watcher; overrides are re-applied per reload.
    let file_config = args.load_base()?;
    let config = args.overlay(file_config.clone())?;

    logging::init_tracing(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "stream-forwarder starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.upstream.base_url,
        referer = %config.upstream.referer(),
        force_content_type = ?config.response.force_content_type,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let (update_tx, config_updates) = mpsc::unbounded_channel::<ForwarderConfig>();
    let _watcher = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, mut file_updates) = ConfigWatcher::new(path, file_config);
            let guard = watcher.run()?;
            let overrides = args.clone();
            tokio::spawn(async move {
                while let Some(reloaded) = file_updates.recv().await {
                    match overrides.overlay(reloaded) {
                        Ok(config) => {
                            let _ = update_tx.send(config);
                        }
                        Err(e) => tracing::error!(error = %e, "Reloaded config rejected"),
                    }
                }
            });
            Some(guard)
        }
        _ => None,
    };

    let server = HttpServer::new(config.clone())?;
    let server_shutdown = shutdown.subscribe();

    match &config.listener.tls {
        Some(tls) => {
            let rustls = load_tls_config(tls).await?;
            let listener = std::net::TcpListener::bind(&config.listener.bind_address)?;
            server
                .run_tls(listener, rustls, config_updates, server_shutdown)
                .await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            server.run(listener, config_updates, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
