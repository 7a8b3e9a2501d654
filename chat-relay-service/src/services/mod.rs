pub mod ai_gateway;
pub mod providers;

pub use ai_gateway::{AiGateway, GatewayError};
