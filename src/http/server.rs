//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Build the gateway and its upstream client from config
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::StaticBearerToken;
use crate::config::GatewayConfig;
use crate::http::handlers::{get_stock_price, health};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::quoting::QuoteGateway;
use crate::upstream::{AlphaVantageClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<QuoteGateway>,
    /// Largest accepted `/api/stock` body; read only after auth passes.
    pub max_body_size: usize,
}

/// HTTP server for the quote gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server backed by the Alpha Vantage client.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let provider = Arc::new(AlphaVantageClient::new(&config.provider)?);
        let verifier = Arc::new(StaticBearerToken::new(&config.auth.bearer_token));
        Ok(Self::with_gateway(config, QuoteGateway::new(verifier, provider)))
    }

    /// Create a server around an already assembled gateway.
    pub fn with_gateway(config: GatewayConfig, gateway: QuoteGateway) -> Self {
        let state = AppState {
            gateway: Arc::new(gateway),
            max_body_size: config.security.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/stock", post(get_stock_price))
            .route("/health", get(health))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id(request.headers()),
                        )
                    }))
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// A clone of the router, for driving the app without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
