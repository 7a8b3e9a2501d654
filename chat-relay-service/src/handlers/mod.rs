//! HTTP handlers for chat-relay-service.

pub mod chat;
pub mod health;
pub mod metrics;

pub use chat::{chat, ChatResponse, INVALID_INPUT_MESSAGE};
pub use health::{health_check, not_found};
pub use metrics::metrics;
