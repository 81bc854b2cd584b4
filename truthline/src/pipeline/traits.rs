use crate::error::{LlmError, SearchError};
use crate::models::SourceRef;
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Single-turn chat completion: role-tagged messages in, free text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

/// One outbound lookup against a web search provider.
///
/// Implementations return result identifiers in provider order and may
/// contain duplicates; [`crate::pipeline::SearchClient`] owns deduplication,
/// the result cap and the degrade-to-empty policy.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<SourceRef>, SearchError>;
}
