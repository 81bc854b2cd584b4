use crate::error::LlmError;
use crate::pipeline::traits::{ChatMessage, LanguageModel, Role};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const TEMPERATURE: f32 = 0.1;

/// OpenAI-compatible chat model with a hard per-call timeout.
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiModel {
    pub fn new(api_key: &str, model: &str, api_base: Option<&str>, timeout: Duration) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, LlmError> {
        let content = message.content.clone();
        let built: ChatCompletionRequestMessage = match message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()?
                .into(),
        };
        Ok(built)
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(TEMPERATURE)
            .messages(messages)
            .build()?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| LlmError::Timeout {
                timeout: self.timeout,
            })??;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;
        debug!(model = %self.model, chars = content.len(), "model replied");
        Ok(content)
    }
}
