//! LLM Collaborator Client
//!
//! The engine talks to the language model through the narrow [`LlmClient`]
//! trait: one prompt in, one reply out, no streaming. The production
//! implementation targets any OpenAI-compatible chat completion endpoint,
//! which covers both OpenAI and Gemini's compatibility surface.

use anyhow::{Result, anyhow};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;

/// A generic client for single-shot text generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends one prompt and returns the model's reply text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// An implementation of `LlmClient` for any OpenAI-compatible API.
pub struct OpenAiCompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - API key and base URL for the endpoint.
    /// * `model` - Model identifier for chat completions (e.g., "gemini-1.5-flash").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow!("LLM response contained no text content"))?;

        Ok(content.trim().to_string())
    }
}
