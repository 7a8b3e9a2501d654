use secrecy::SecretString;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Gemini REST endpoint used when `GEMINI_API_BASE` is not set.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when `GENAI_TEXT_MODEL` is not set.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";

/// Environment variable holding the Google AI credential.
pub const API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    /// OTLP collector; spans are only exported when this is set.
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// `None` leaves the AI gateway permanently disabled.
    pub api_key: Option<SecretString>,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub text_model: String,
}

impl RelayConfig {
    /// Load configuration from the environment.
    ///
    /// A missing API key is not an error: the relay still starts and answers
    /// every chat with the "not configured" message.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(RelayConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: optional_env(API_KEY_ENV).map(SecretString::new),
                api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            },
            models: ModelConfig {
                text_model: env_or("GENAI_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            },
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
        })
    }

    pub fn ai_configured(&self) -> bool {
        self.google.api_key.is_some()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            google: GoogleConfig {
                api_key: None,
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            },
            models: ModelConfig {
                text_model: DEFAULT_TEXT_MODEL.to_string(),
            },
            otlp_endpoint: None,
        }
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
