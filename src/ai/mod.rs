pub mod client;
#[cfg(test)]
pub mod mock;

// Public API exports
pub use client::{
    ChatChannel, LanguageModel, OpenRouterModel, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, STRICT_TEMPERATURE,
};
