pub mod analyzer;
pub mod extractor;
pub mod llm;
pub mod mock;
pub mod orchestrator;
pub mod parse;
pub mod search;
pub mod traits;
pub mod verifier;

pub use analyzer::{DocumentAnalysis, DocumentAnalyzer};
pub use extractor::ClaimExtractor;
pub use llm::OpenAiModel;
pub use mock::{FailingSearch, ScriptedModel, StaticSearch};
pub use orchestrator::Pipeline;
pub use parse::{parse_analysis, ParsedAnalysis};
pub use search::{DuckDuckGoBackend, SearchClient};
pub use traits::{ChatMessage, LanguageModel, Role, SearchBackend};
pub use verifier::ClaimVerifier;
