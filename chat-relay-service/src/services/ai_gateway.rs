//! Gateway to the hosted language model.
//!
//! Every failure mode of the upstream call is folded into a human-readable
//! string, so callers always get text back and never an error.

use super::providers::{FinishReason, ProviderError, TextProvider};
use crate::utils::log_preview;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;

/// Why the gateway could not produce model text. `Display` is the exact
/// string shown to the end user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Error: AI service is not configured or unavailable.")]
    NotConfigured,

    #[error(
        "The AI did not provide a response. This might be due to safety settings or an internal issue."
    )]
    NoResponse,

    #[error("AI response blocked due to: {0}.")]
    Blocked(FinishReason),

    #[error("The AI provided an empty response.")]
    EmptyResponse,

    #[error("Error: {}", communication_detail(.0))]
    Provider(#[source] ProviderError),
}

impl GatewayError {
    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::NotConfigured => "not_configured",
            GatewayError::NoResponse => "no_response",
            GatewayError::Blocked(_) => "blocked",
            GatewayError::EmptyResponse => "empty",
            GatewayError::Provider(_) => "provider_error",
        }
    }
}

fn communication_detail(err: &ProviderError) -> String {
    let mut detail = String::from("Failed to communicate with the AI service.");

    let message = err.to_string();
    if !message.is_empty() {
        detail.push_str(&format!(" Details: {}", message));
    }
    if let Some(status) = err.status() {
        detail.push_str(&format!(" (Status: {})", status));
    }

    detail
}

/// Single-call gateway around an optional text provider.
///
/// Built once at startup and shared by all requests; without a provider it
/// stays disabled for the life of the process.
#[derive(Clone, Default)]
pub struct AiGateway {
    provider: Option<Arc<dyn TextProvider>>,
}

impl AiGateway {
    pub fn new(provider: Option<Arc<dyn TextProvider>>) -> Self {
        Self { provider }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Reply text for `message`, or the rendered failure. Never fails.
    pub async fn generate_reply(&self, message: &str) -> String {
        match self.try_generate(message).await {
            Ok(text) => {
                counter!("chat_relay_gateway_outcomes_total", "outcome" => "ok").increment(1);
                text
            }
            Err(err) => {
                counter!("chat_relay_gateway_outcomes_total", "outcome" => err.outcome())
                    .increment(1);
                err.to_string()
            }
        }
    }

    /// Issue exactly one provider call and classify the result.
    pub async fn try_generate(&self, message: &str) -> Result<String, GatewayError> {
        let Some(provider) = &self.provider else {
            tracing::error!("AI model not initialized. Check API key and configuration.");
            return Err(GatewayError::NotConfigured);
        };

        tracing::info!(
            model = %provider.model(),
            message = %log_preview(message),
            "Sending message to AI"
        );

        let response = match provider.generate(message).await {
            Ok(Some(response)) => response,
            Ok(None) => {
                tracing::warn!("AI response was empty or undefined");
                return Err(GatewayError::NoResponse);
            }
            Err(err) => {
                tracing::error!(error = %err, status = ?err.status(), "Error calling Google AI API");
                return Err(GatewayError::Provider(err));
            }
        };

        if response.text.is_empty() {
            tracing::warn!(finish_reason = ?response.finish_reason, "AI response content was empty");
            return match response.finish_reason {
                Some(reason) if reason != FinishReason::Stop => Err(GatewayError::Blocked(reason)),
                _ => Err(GatewayError::EmptyResponse),
            };
        }

        tracing::info!(
            response = %log_preview(&response.text),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "AI response received"
        );

        Ok(response.text)
    }
}
