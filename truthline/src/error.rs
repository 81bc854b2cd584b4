//! Error types for the analysis pipeline.
//!
//! Only failures that the caller must see are represented here. Degraded
//! conditions (empty search results, no claims, unreadable sections of the
//! model output) are absorbed by the stages that encounter them.

/// Failures surfaced by [`crate::pipeline::Pipeline`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("language model error: {0}")]
    Llm(#[from] LlmError),
}

/// Errors from a language-model invocation.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("model request failed: {message}")]
    Request { message: String },

    #[error("model request timed out after {timeout:?}")]
    Timeout { timeout: std::time::Duration },

    #[error("model response contained no content")]
    EmptyResponse,
}

impl From<async_openai::error::OpenAIError> for LlmError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        LlmError::Request {
            message: err.to_string(),
        }
    }
}

/// Errors from a search backend. Never leaves [`crate::pipeline::SearchClient`].
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search provider returned HTTP {0}")]
    Status(u16),

    #[error("invalid search url: {0}")]
    Url(#[from] url::ParseError),
}

/// Service configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key not found in environment variables")]
    MissingApiKey,

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
