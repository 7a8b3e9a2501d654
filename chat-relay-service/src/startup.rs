//! Application startup and lifecycle management.
//!
//! Builds the AI gateway from configuration, wires the HTTP router and runs
//! the server until a shutdown signal arrives.

use crate::config::{RelayConfig, API_KEY_ENV};
use crate::handlers::{chat, health_check, metrics, not_found};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::AiGateway;
use axum::{
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::error::AppError;
use service_core::middleware::{
    json_cors_headers_middleware, metrics_middleware, request_id_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Path of the relay endpoint.
pub const CHAT_PATH: &str = "/chat";

/// Path the endpoint had as a hosted function; kept so existing forms keep working.
pub const LEGACY_CHAT_PATH: &str = "/.netlify/functions/chat";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: AiGateway,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(gateway: AiGateway) -> Self {
        Self {
            gateway,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Construct the gateway once for the whole process: a Gemini-backed gateway
/// when a credential is configured, a permanently disabled one otherwise.
pub fn build_gateway(config: &RelayConfig) -> AiGateway {
    let Some(api_key) = config.google.api_key.clone() else {
        tracing::error!(
            "{} environment variable is not set; AI gateway disabled",
            API_KEY_ENV
        );
        return AiGateway::disabled();
    };

    let text_provider: Arc<dyn TextProvider> = Arc::new(GeminiTextProvider::new(GeminiConfig {
        api_key,
        model: config.models.text_model.clone(),
        api_base: config.google.api_base.clone(),
    }));

    tracing::info!(
        model = %config.models.text_model,
        "Initialized Gemini text provider"
    );

    AiGateway::new(Some(text_provider))
}

/// Build the HTTP router.
///
/// The JSON/CORS header middleware only wraps the relay routes; `/health` and
/// `/metrics` keep their own content types.
pub fn build_router(state: AppState) -> Router {
    let relay = Router::new()
        .route(CHAT_PATH, any(chat))
        .route(LEGACY_CHAT_PATH, any(chat))
        .layer(from_fn(json_cors_headers_middleware));

    Router::new()
        .merge(relay)
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(
        config: RelayConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        let mut state = AppState::new(build_gateway(&config));
        if let Some(handle) = metrics {
            state = state.with_metrics(handle);
        }

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            ai_configured = state.gateway.is_configured(),
            "Chat relay service: HTTP on port {}",
            port
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
