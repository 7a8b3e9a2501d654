use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::Method,
    Json,
};
use serde::Serialize;
use service_core::error::AppError;
use service_core::middleware::RequestId;

use crate::startup::AppState;
use crate::utils::{extract_user_message, format_response, parse_request_body};

/// Upper bound on the request body read by the relay.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub const INVALID_INPUT_MESSAGE: &str =
    "Invalid input: 'user-message' not found or empty in request body.data";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
}

/// Relay one form message to the AI gateway.
///
/// Method is checked before the body is touched. A body that fails to parse
/// as JSON is a 500, matching the catch-all behaviour clients already rely on;
/// upstream AI failures come back as a normal 200 reply.
#[tracing::instrument(
    skip(state, request),
    fields(method = %request.method(), request_id = tracing::field::Empty)
)]
pub async fn chat(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ChatResponse>, AppError> {
    if let Some(RequestId(id)) = request.extensions().get::<RequestId>() {
        tracing::Span::current().record("request_id", id.as_str());
    }

    if request.method() != Method::POST {
        return Err(AppError::MethodNotAllowed("POST"));
    }

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

    let payload = parse_request_body(&body)?;

    let Some(user_message) = extract_user_message(&payload) else {
        tracing::warn!(
            body = %String::from_utf8_lossy(&body),
            "Received invalid input body"
        );
        return Err(AppError::BadRequest(INVALID_INPUT_MESSAGE.to_string()));
    };

    let ai_response = state.gateway.generate_reply(&user_message).await;

    Ok(Json(ChatResponse {
        response: format_response(&ai_response),
    }))
}
