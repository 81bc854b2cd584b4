use crate::error::LlmError;
use crate::models::{Claim, FactCheck, SourceRef};
use crate::pipeline::search::SearchClient;
use crate::pipeline::traits::{ChatMessage, LanguageModel, SearchBackend};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

/// Corroborating lookups per claim.
pub const CLAIM_SEARCH_RESULTS: usize = 2;

/// Verification text recorded for a claim whose model call failed.
pub const VERIFICATION_UNAVAILABLE: &str =
    "STATUS: UNVERIFIABLE\nREASONING: Verification could not be completed for this claim.";

pub struct ClaimVerifier<M: LanguageModel + ?Sized, B: SearchBackend + ?Sized> {
    model: Arc<M>,
    search: SearchClient<B>,
    concurrency: usize,
}

impl<M, B> ClaimVerifier<M, B>
where
    M: LanguageModel + ?Sized,
    B: SearchBackend + ?Sized,
{
    pub fn new(model: Arc<M>, search: SearchClient<B>) -> Self {
        Self {
            model,
            search,
            concurrency: 1,
        }
    }

    /// Number of claims verified at once. `1` keeps the round trips strictly
    /// sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Searches for the claim, then asks the model to classify it.
    ///
    /// The model only sees the claim; search hits are not fed back, the first
    /// one simply becomes the fact check's source.
    pub async fn verify(&self, claim: &Claim) -> Result<FactCheck, LlmError> {
        let (source, verification) = self.round_trip(claim).await;
        Ok(FactCheck::new(claim.clone(), verification?, source))
    }

    /// Verifies every claim, keeping claim order. A failed model call yields a
    /// default UNVERIFIABLE fact check for that claim only.
    pub async fn verify_all(&self, claims: &[Claim]) -> Vec<FactCheck> {
        // Built before streaming: a closure-mapped stream fails the `Send`
        // check once the pipeline holds `dyn` providers.
        let pending: Vec<_> = claims
            .iter()
            .map(|claim| self.verify_isolated(claim))
            .collect();
        stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn verify_isolated(&self, claim: &Claim) -> FactCheck {
        let (source, verification) = self.round_trip(claim).await;
        let verification = verification.unwrap_or_else(|err| {
            warn!(claim = %claim, error = %err, "claim verification failed");
            VERIFICATION_UNAVAILABLE.to_string()
        });
        FactCheck::new(claim.clone(), verification, source)
    }

    async fn round_trip(&self, claim: &Claim) -> (Option<SourceRef>, Result<String, LlmError>) {
        let source = self.lookup_source(claim).await;
        (source, self.judge(claim).await)
    }

    async fn lookup_source(&self, claim: &Claim) -> Option<SourceRef> {
        self.search
            .search(claim.statement(), CLAIM_SEARCH_RESULTS)
            .await
            .into_iter()
            .next()
    }

    async fn judge(&self, claim: &Claim) -> Result<String, LlmError> {
        let prompt = build_prompt(claim);
        let reply = self.model.complete(&[ChatMessage::user(prompt)]).await?;
        debug!(claim = %claim, "claim judged");
        Ok(reply)
    }
}

fn build_prompt(claim: &Claim) -> String {
    format!(
        "Verify this specific claim based on general knowledge and logic:\n\n\
CLAIM: \"{claim}\"\n\n\
Respond with:\n\
STATUS: [VERIFIED/DISPUTED/UNVERIFIABLE]\n\
REASONING: [Brief explanation]\n"
    )
}
