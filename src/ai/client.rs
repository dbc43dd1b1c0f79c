use crate::config::Config;
use crate::errors::ConfigError;
use crate::models::ChatTurn;
use async_trait::async_trait;
use openrouter_api::{
    models::provider_preferences::ProviderPreferences,
    models::provider_preferences::ProviderSort,
    types::chat::{ChatCompletionRequest, Message},
};
use std::sync::Arc;

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
/// Low temperature for the classification, quiz and analysis prompts, whose
/// replies must come back near-deterministic and machine-readable.
pub const STRICT_TEMPERATURE: f32 = 0.2;

/// The language-model collaborator. `generate` is a stateless single-shot
/// call; `start_chat` opens a conversational channel that carries its own
/// history.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    fn start_chat(&self) -> Box<dyn ChatChannel>;
}

/// A stateful conversation with the model. Each successful `send` becomes
/// part of the context of the next one; a failed call adds nothing.
#[async_trait]
pub trait ChatChannel: Send {
    async fn send(
        &mut self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug)]
pub struct OpenRouterModel {
    client: Arc<openrouter_api::OpenRouterClient<openrouter_api::Ready>>,
    config: Config,
}

impl OpenRouterModel {
    /// Reads the API key from the environment (`OPENROUTER_API_KEY`).
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let client = openrouter_api::OpenRouterClient::quick()
            .map_err(|e| ConfigError::ClientInit(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenRouterModel {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let messages = vec![Message::text("user", prompt)];
        complete(&self.client, &self.config, messages, temperature).await
    }

    fn start_chat(&self) -> Box<dyn ChatChannel> {
        Box::new(OpenRouterChannel {
            client: Arc::clone(&self.client),
            config: self.config.clone(),
            history: Vec::new(),
        })
    }
}

struct OpenRouterChannel {
    client: Arc<openrouter_api::OpenRouterClient<openrouter_api::Ready>>,
    config: Config,
    history: Vec<ChatTurn>,
}

#[async_trait]
impl ChatChannel for OpenRouterChannel {
    async fn send(
        &mut self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let mut messages: Vec<Message> = self
            .history
            .iter()
            .map(|turn| Message::text(turn.role.as_str(), &turn.content))
            .collect();
        messages.push(Message::text("user", prompt));

        let reply = complete(&self.client, &self.config, messages, self.config.temperature).await?;

        self.history.push(ChatTurn::user(prompt));
        self.history.push(ChatTurn::assistant(reply.clone()));
        Ok(reply)
    }
}

async fn complete(
    client: &openrouter_api::OpenRouterClient<openrouter_api::Ready>,
    config: &Config,
    messages: Vec<Message>,
    temperature: f32,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let provider = ProviderPreferences::new().with_sort(ProviderSort::Throughput);

    let request = ChatCompletionRequest {
        model: config.model.clone(),
        messages,
        provider: Some(provider),
        stream: None,
        response_format: None,
        tools: None,
        tool_choice: None,
        models: None,
        transforms: None,
        route: None,
        user: None,
        max_tokens: Some(config.max_tokens),
        temperature: Some(temperature),
        top_p: None,
        top_k: None,
        frequency_penalty: None,
        presence_penalty: None,
        repetition_penalty: None,
        min_p: None,
        top_a: None,
        seed: None,
        stop: None,
        logit_bias: None,
        logprobs: None,
        top_logprobs: None,
        prediction: None,
        parallel_tool_calls: None,
        verbosity: None,
    };

    let response = client
        .chat()?
        .chat_completion(request)
        .await
        .map_err(|e| format!("OpenRouter API error: {}", e))?;

    if let Some(choice) = response.choices.first() {
        match &choice.message.content {
            openrouter_api::MessageContent::Text(text) => Ok(text.clone()),
            openrouter_api::MessageContent::Parts(parts) => {
                let text_parts: Vec<String> = parts
                    .iter()
                    .filter_map(|p| {
                        if let openrouter_api::ContentPart::Text(tc) = p {
                            Some(tc.text.clone())
                        } else {
                            None
                        }
                    })
                    .collect();
                Ok(text_parts.join("\n"))
            }
        }
    } else {
        Err("No response choices received".into())
    }
}
