//! Misinformation assessment for free text.
//!
//! [`pipeline::Pipeline`] pulls checkable claims out of the text, verifies
//! each with a search lookup and a model judgment, then asks the model for a
//! document-level verdict and reads it back into an [`models::AnalysisResult`].

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::Settings;
pub use error::{ConfigError, LlmError, PipelineError, SearchError};
pub use models::{AnalysisReport, AnalysisResult, Verdict};
pub use pipeline::Pipeline;
