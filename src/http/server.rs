//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the forward handler on every path
//! - Wire up middleware (request ID, tracing)
//! - Serve over plain TCP or TLS with graceful shutdown
//! - Apply reloaded forwarding settings

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{routing::any, Router};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ForwarderConfig, ForwardingSettings};
use crate::error::ForwardResult;
use crate::http::handler::forward_handler;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ArcSwap<ForwardingSettings>>,
    pub client: UpstreamClient,
}

/// HTTP server for the forwarder.
pub struct HttpServer {
    router: Router,
    config: ForwarderConfig,
    settings: Arc<ArcSwap<ForwardingSettings>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ForwarderConfig) -> ForwardResult<Self> {
        let settings = Arc::new(ArcSwap::from_pointee(config.forwarding()));
        let state = AppState {
            settings: settings.clone(),
            client: UpstreamClient::new()?,
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            settings,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(forward_handler))
            .route("/{*path}", any(forward_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID)),
            )
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live forwarding settings.
    pub fn settings(&self) -> Arc<ArcSwap<ForwardingSettings>> {
        self.settings.clone()
    }

    /// Run the server on a plain TCP listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<ForwarderConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        self.spawn_reloader(config_updates);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS termination until `shutdown` fires.
    pub async fn run_tls(
        self,
        listener: std::net::TcpListener,
        tls: RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<ForwarderConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;
        tracing::info!(address = %addr, "HTTPS server starting");

        self.spawn_reloader(config_updates);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            shutdown_handle.graceful_shutdown(None);
        });

        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    fn spawn_reloader(&self, mut config_updates: mpsc::UnboundedReceiver<ForwarderConfig>) {
        let settings = self.settings.clone();
        let listener = self.config.listener.clone();

        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                if new_config.listener != listener {
                    tracing::warn!("Listener settings changed; they apply after a restart");
                }
                settings.store(Arc::new(new_config.forwarding()));
                tracing::info!(
                    base_url = %new_config.upstream.base_url,
                    force_content_type = ?new_config.response.force_content_type,
                    "Forwarding settings reloaded"
                );
            }
        });
    }
}
