//! AI provider abstractions and implementations.
//!
//! The relay talks to its model through [`TextProvider`], so the Gemini
//! client can be swapped for the mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Non-success HTTP reply from the provider.
    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("{0}")]
    NetworkError(String),

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// HTTP status reported by the provider, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Reason why generation stopped, as reported by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    Other(String),
}

impl FinishReason {
    pub fn from_api(value: &str) -> Self {
        match value {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            other => FinishReason::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Other(other) => other,
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reply produced by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Concatenated text of the first candidate; may be empty.
    pub text: String,

    pub finish_reason: Option<FinishReason>,

    pub input_tokens: i32,

    pub output_tokens: i32,
}

impl ProviderResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: Some(FinishReason::Stop),
            input_tokens: 0,
            output_tokens: 0,
        }
    }
}

/// Trait for single-shot text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `prompt` as the whole user turn and return the reply.
    ///
    /// `Ok(None)` means the provider answered without any reply at all.
    async fn generate(&self, prompt: &str) -> Result<Option<ProviderResponse>, ProviderError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
