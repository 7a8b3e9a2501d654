use axum::{extract::State, http::Uri, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::startup::AppState;

/// Liveness probe. Reports whether the AI gateway has a credential, but stays
/// healthy either way since the relay still answers without one.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "chat-relay-service",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_configured": state.gateway.is_configured()
    }))
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
