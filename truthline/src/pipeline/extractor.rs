use crate::error::LlmError;
use crate::models::Claim;
use crate::pipeline::traits::{ChatMessage, LanguageModel};
use std::sync::Arc;
use tracing::debug;

pub const CLAIM_MARKER: &str = "CLAIM:";
/// Upper bound on claims per run; each claim costs one search and one model call.
pub const MAX_CLAIMS: usize = 3;

pub struct ClaimExtractor<M: LanguageModel + ?Sized> {
    model: Arc<M>,
}

impl<M: LanguageModel + ?Sized> ClaimExtractor<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    /// Asks the model for checkable assertions and returns at most
    /// [`MAX_CLAIMS`] of them. No marker lines means no claims, not an error.
    pub async fn extract(&self, text: &str) -> Result<Vec<Claim>, LlmError> {
        let prompt = build_prompt(text);
        let reply = self.model.complete(&[ChatMessage::user(prompt)]).await?;
        let claims = parse_claims(&reply);
        debug!(count = claims.len(), "claims extracted");
        Ok(claims)
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "Extract the key factual claims from this text that can be verified:\n\n\
Text: \"{text}\"\n\n\
Return only the main verifiable claims, one per line, in this format:\n\
{CLAIM_MARKER} [specific factual claim]\n\n\
Focus on:\n\
- Specific facts, numbers, dates, events\n\
- Claims about people, companies, organizations\n\
- Statistical information\n\
- Concrete statements that can be fact-checked\n"
    )
}

pub fn parse_claims(reply: &str) -> Vec<Claim> {
    reply
        .lines()
        .filter(|line| line.contains(CLAIM_MARKER))
        .map(|line| line.replacen(CLAIM_MARKER, "", 1).trim().to_string())
        .filter(|statement| !statement.is_empty())
        .take(MAX_CLAIMS)
        .map(Claim::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::mock::ScriptedModel;

    #[test]
    fn parses_marker_lines_only() {
        let reply = "Here are the claims:\nCLAIM: The tower is 330 m tall\n\n  CLAIM:   It opened in 1889  \nnoise";
        let claims = parse_claims(reply);
        assert_eq!(
            claims,
            vec![Claim::new("The tower is 330 m tall"), Claim::new("It opened in 1889")]
        );
    }

    #[test]
    fn caps_at_three_claims() {
        let reply = (1..=7)
            .map(|i| format!("CLAIM: fact number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let claims = parse_claims(&reply);
        assert_eq!(claims.len(), MAX_CLAIMS);
        assert_eq!(claims[2], Claim::new("fact number 3"));
    }

    #[test]
    fn marker_anywhere_in_line_and_blank_claims_skipped() {
        let claims = parse_claims("1. CLAIM: Paris is in France\nCLAIM:   ");
        assert_eq!(claims, vec![Claim::new("1.  Paris is in France")]);
    }

    #[test]
    fn no_markers_means_no_claims() {
        assert!(parse_claims("I could not find any verifiable claims.").is_empty());
    }

    #[tokio::test]
    async fn extract_sends_text_in_prompt() {
        let model = Arc::new(ScriptedModel::new("CLAIM: Water boils at 100C"));
        let extractor = ClaimExtractor::new(model.clone());
        let claims = extractor.extract("Water boils at 100C at sea level.").await.unwrap();
        assert_eq!(claims, vec![Claim::new("Water boils at 100C")]);
        assert_eq!(model.calls(), 1);
        assert!(model.prompts()[0].contains("Water boils at 100C at sea level."));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let extractor = ClaimExtractor::new(Arc::new(ScriptedModel::failing()));
        assert!(extractor.extract("text").await.is_err());
    }
}
