//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::fetch::{FetchEngine, FetchError};
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::rewrite::PROXY_PATH;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<FetchEngine>,
    pub banner: bool,
}

impl AppState {
    pub fn new(config: &ProxyConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Arc::new(FetchEngine::new(&config.upstream)?),
            banner: config.rewrite.banner,
        })
    }
}

/// HTTP server for the rewriting proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, FetchError> {
        let state = AppState::new(&config)?;
        let router = build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream_timeout_secs = self.config.upstream.timeout_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                if shutdown.recv().await.is_err() {
                    tracing::warn!("Shutdown channel closed");
                }
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ProxyConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::landing))
        .route("/open", post(handlers::open))
        .route(PROXY_PATH, get(handlers::proxy))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
