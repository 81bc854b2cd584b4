use crate::models::claim::{FactCheck, SourceRef};
use crate::models::ids::RunId;
use crate::models::verdict::{Confidence, Verdict};
use serde::{Deserialize, Serialize};

/// Terminal output of one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub explanation: String,
    pub key_points: Vec<String>,
    pub sources: Vec<SourceRef>,
    pub fact_checks: Vec<FactCheck>,
}

/// An [`AnalysisResult`] together with the unparsed document-level model
/// output it was read from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub run_id: RunId,
    pub analysis: AnalysisResult,
    pub raw_analysis: String,
}
