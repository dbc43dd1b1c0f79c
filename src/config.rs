use crate::ai::client::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::errors::ConfigError;

/// Environment variable holding the OpenRouter credential. The client reads
/// it itself; startup only verifies it is present.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Optional override for the model id.
pub const MODEL_ENV: &str = "STUDY_BUDDY_MODEL";

/// Request settings shared by every LLM call in a session.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Config {
    /// Loads `.env` if present, verifies the credential, and reads overrides.
    /// A missing or blank credential fails here, before any request is made.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match lookup(API_KEY_ENV) {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingApiKey(API_KEY_ENV)),
        }

        let mut config = Self::default();
        if let Some(model) = lookup(MODEL_ENV)
            && !model.trim().is_empty()
        {
            config.model = model.trim().to_string();
        }
        Ok(config)
    }
}
