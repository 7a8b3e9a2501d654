use axum::{extract::State, response::IntoResponse};
use service_core::observability::metrics::METRICS_DISABLED;

use crate::startup::AppState;

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_else(|| METRICS_DISABLED.to_string())
}
