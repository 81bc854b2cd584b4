use crate::error::LlmError;
use crate::models::FactCheck;
use crate::pipeline::parse::{
    parse_analysis, ParsedAnalysis, CONFIDENCE_HEADER, EXPLANATION_HEADER,
    FACT_CHECK_SUMMARY_HEADER, KEY_POINTS_HEADER, VERDICT_HEADER,
};
use crate::pipeline::traits::{ChatMessage, LanguageModel};
use std::sync::Arc;
use tracing::debug;

const SUMMARY_CLAIM_CHARS: usize = 100;

const RUBRIC: &str = "\
Analyze considering:

1. LOGICAL CONSISTENCY:
   - Does this make logical sense?
   - Are there obvious contradictions?
   - Does it align with how the world actually works?

2. VERIFIABILITY:
   - Can the main claims be verified?
   - Are there specific details that can be fact-checked?
   - Does it contain vague or unverifiable statements?

3. RED FLAGS:
   - Sensationalized language
   - Emotional manipulation
   - Missing context or sources
   - Extraordinary claims without evidence
   - Biased or leading language

4. PLAUSIBILITY:
   - Is this something that could realistically happen?
   - Does it align with known facts about the entities mentioned?
   - Are the claims proportional and reasonable?

CONFIDENCE SCORING GUIDE:
- 100%: Absolutely certain, indisputable evidence
- 90-95%: Overwhelming evidence, clearly verifiable
- 80-89%: Strong evidence, highly likely
- 70-79%: Good evidence, probably correct
- 60-69%: Some evidence, leaning toward assessment
- 50-59%: Insufficient evidence, uncertain
- Below 50%: Evidence contradicts the claim
";

/// Document-level judgment: one prompt, one model call, one parse.
pub struct DocumentAnalyzer<M: LanguageModel + ?Sized> {
    model: Arc<M>,
}

/// Parsed fields plus the reply they came from.
#[derive(Clone, Debug)]
pub struct DocumentAnalysis {
    pub parsed: ParsedAnalysis,
    pub raw: String,
}

impl<M: LanguageModel + ?Sized> DocumentAnalyzer<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    pub async fn analyze(
        &self,
        text: &str,
        fact_checks: &[FactCheck],
    ) -> Result<DocumentAnalysis, LlmError> {
        let prompt = build_prompt(text, fact_checks);
        let raw = self.model.complete(&[ChatMessage::user(prompt)]).await?;
        let parsed = parse_analysis(&raw);
        debug!(verdict = %parsed.verdict, confidence = %parsed.confidence, "document analyzed");
        Ok(DocumentAnalysis { parsed, raw })
    }
}

pub fn build_prompt(text: &str, fact_checks: &[FactCheck]) -> String {
    let context = fact_checks
        .iter()
        .map(|fc| format!("- {}: {}", fc.claim, fc.verification))
        .collect::<Vec<_>>()
        .join("\n");
    let summary = fact_checks
        .iter()
        .map(|fc| {
            let claim: String = fc.claim.statement().chars().take(SUMMARY_CLAIM_CHARS).collect();
            format!("• {}... - {}", claim, fc.status.summary_marker())
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert fact-checker and misinformation analyst. \
Analyze this text with EXTREME SCRUTINY and logical reasoning.

IMPORTANT: Be very conservative with confidence scores. \
Only give high confidence (80%+) when you have strong evidence.

Text to analyze: \"{text}\"

Additional context from fact-checking:
{context}

{RUBRIC}
Respond in this EXACT format:

{VERDICT_HEADER} [REAL NEWS/FAKE NEWS/POTENTIALLY MISLEADING/INSUFFICIENT DATA]
{CONFIDENCE_HEADER} [number between 0-100]%

{EXPLANATION_HEADER}
[2-3 sentences explaining your reasoning and why you assigned this confidence level]

{KEY_POINTS_HEADER}
• [Point 1 about credibility/logic]
• [Point 2 about verifiability]
• [Point 3 about red flags or supporting evidence]
• [Point 4 about overall plausibility]

{FACT_CHECK_SUMMARY_HEADER}
{summary}
"
    )
}
