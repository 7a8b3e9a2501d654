//! Mock provider implementation for testing.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Canned outcome returned by every call to the mock.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Reply(ProviderResponse),
    NoReply,
    Fail(ProviderError),
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    outcome: MockOutcome,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockTextProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Answers every prompt with `text` and a normal `STOP`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockOutcome::Reply(ProviderResponse::text(text)))
    }

    /// Answers with `text` and the given finish reason.
    pub fn finishing(text: impl Into<String>, finish_reason: Option<FinishReason>) -> Self {
        Self::new(MockOutcome::Reply(ProviderResponse {
            text: text.into(),
            finish_reason,
            input_tokens: 0,
            output_tokens: 0,
        }))
    }

    pub fn without_reply() -> Self {
        Self::new(MockOutcome::NoReply)
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::new(MockOutcome::Fail(error))
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<Option<ProviderResponse>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.outcome {
            MockOutcome::Reply(response) => Ok(Some(response.clone())),
            MockOutcome::NoReply => Ok(None),
            MockOutcome::Fail(error) => Err(error.clone()),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
