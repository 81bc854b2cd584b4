pub mod analysis;
pub mod claim;
pub mod ids;
pub mod verdict;
pub mod verify;

pub use analysis::{AnalysisReport, AnalysisResult};
pub use claim::{Claim, FactCheck, SourceRef};
pub use ids::RunId;
pub use verdict::{Confidence, UnknownVerdict, Verdict};
pub use verify::ClaimStatus;
