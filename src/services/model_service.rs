//! Adapter over the remote text-generation service.
//!
//! The question pipeline only sees [`TextGenerator`]; the production
//! implementation talks to any OpenAI-compatible chat completion endpoint
//! (Groq by default) through `async-openai`.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Which configured model handles a prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelTier {
    /// Drafting and classification.
    Fast,
    /// Planning, auditing and rewriting.
    Smart,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, tier: ModelTier, prompt: &str) -> AppResult<String>;
}

pub struct OpenAiModelService {
    client: Client<OpenAIConfig>,
    fast_model: String,
    smart_model: String,
}

impl OpenAiModelService {
    pub fn from_config(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.llm_api_base.clone())
            .with_api_key(config.llm_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
            fast_model: config.llm_fast_model.clone(),
            smart_model: config.llm_smart_model.clone(),
        }
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Smart => &self.smart_model,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiModelService {
    async fn generate(&self, tier: ModelTier, prompt: &str) -> AppResult<String> {
        let model = self.model_for(tier);

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model);
        args.messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt),
        )]);
        let request = args
            .build()
            .map_err(|e| AppError::ModelError(format!("Chat request build failed: {}", e)))?;

        log::debug!(
            "Sending chat completion to model {} ({} prompt chars)",
            model,
            prompt.len()
        );

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::ModelError(format!("Model {} returned no content", model)))?;

        log::debug!("Model {} replied with {} chars", model, content.len());
        Ok(content)
    }
}
