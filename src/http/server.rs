//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the axum Router with the relay handlers
//! - Wire up middleware (request ID, tracing)
//! - Serve on a listener owned by the caller
//! - Stop on the shutdown broadcast

use axum::{
    http::{HeaderValue, Request},
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestId, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::http::handler::{method_not_allowed, preflight_handler, relay_handler};
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
///
/// Holds no per-request data; cloning it is cheap.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// Error raised while setting up or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// UUID v4 request IDs, attached as `x-request-id` for trace correlation.
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// HTTP server for the CORS relay.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a new relay server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let state = AppState {
            upstream: UpstreamClient::new(&config.timeouts)?,
        };
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Every path carries the same two methods; anything else gets 405.
    /// HEAD is rejected explicitly, otherwise axum would answer it with the
    /// GET handler and contact the upstream.
    fn build_router(state: AppState) -> Router {
        let endpoint = get(relay_handler)
            .head(method_not_allowed)
            .options(preflight_handler);
        Router::new()
            .route("/", endpoint.clone())
            .route("/{*path}", endpoint)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Consume the server, returning its router (used by in-process tests).
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server on `listener` until a shutdown message arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream_timeout_secs = self.config.timeouts.upstream_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
