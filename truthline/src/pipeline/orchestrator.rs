use crate::error::PipelineError;
use crate::models::{AnalysisReport, AnalysisResult, RunId};
use crate::pipeline::analyzer::DocumentAnalyzer;
use crate::pipeline::extractor::ClaimExtractor;
use crate::pipeline::search::SearchClient;
use crate::pipeline::traits::{LanguageModel, SearchBackend};
use crate::pipeline::verifier::ClaimVerifier;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};

/// Related-sources results requested for the whole document.
pub const RELATED_SEARCH_RESULTS: usize = 3;
/// Characters of the input used to seed the related-sources query.
pub const RELATED_QUERY_PREFIX_CHARS: usize = 100;

/// Extract claims, verify them, search related sources, judge the document.
///
/// Holds no per-run state, so one `Pipeline` can serve concurrent callers.
pub struct Pipeline<M: LanguageModel + ?Sized, B: SearchBackend + ?Sized> {
    extractor: ClaimExtractor<M>,
    verifier: ClaimVerifier<M, B>,
    analyzer: DocumentAnalyzer<M>,
    search: SearchClient<B>,
}

impl<M, B> Pipeline<M, B>
where
    M: LanguageModel + ?Sized,
    B: SearchBackend + ?Sized,
{
    pub fn new(model: Arc<M>, backend: Arc<B>) -> Self {
        let search = SearchClient::new(backend);
        Self {
            extractor: ClaimExtractor::new(Arc::clone(&model)),
            verifier: ClaimVerifier::new(Arc::clone(&model), search.clone()),
            analyzer: DocumentAnalyzer::new(model),
            search,
        }
    }

    pub fn with_verify_concurrency(mut self, concurrency: usize) -> Self {
        self.verifier = self.verifier.with_concurrency(concurrency);
        self
    }

    pub async fn run(&self, text: &str) -> Result<AnalysisResult, PipelineError> {
        self.run_report(text).await.map(|report| report.analysis)
    }

    /// Like [`Pipeline::run`], also returning the raw document-level reply.
    pub async fn run_report(&self, text: &str) -> Result<AnalysisReport, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }
        let run_id = RunId::new();
        let span = tracing::info_span!("analysis", %run_id);
        let result = self.execute(run_id, text).instrument(span.clone()).await;
        if let Err(err) = &result {
            span.in_scope(|| error!(error = %err, "analysis failed"));
        }
        result
    }

    async fn execute(&self, run_id: RunId, text: &str) -> Result<AnalysisReport, PipelineError> {
        info!(chars = text.chars().count(), "analysis started");

        let claims = match self.extractor.extract(text).await {
            Ok(claims) => claims,
            Err(err) => {
                warn!(error = %err, "claim extraction failed, continuing without claims");
                Vec::new()
            }
        };
        let fact_checks = self.verifier.verify_all(&claims).await;

        let query = related_query(text);
        let sources = self.search.search(&query, RELATED_SEARCH_RESULTS).await;

        let document = self.analyzer.analyze(text, &fact_checks).await?;
        let parsed = document.parsed;
        info!(
            verdict = %parsed.verdict,
            confidence = %parsed.confidence,
            claims = fact_checks.len(),
            sources = sources.len(),
            "analysis finished"
        );

        Ok(AnalysisReport {
            run_id,
            analysis: AnalysisResult {
                verdict: parsed.verdict,
                confidence: parsed.confidence,
                explanation: parsed.explanation,
                key_points: parsed.key_points,
                sources,
                fact_checks,
            },
            raw_analysis: document.raw,
        })
    }
}

fn related_query(text: &str) -> String {
    let prefix: String = text.chars().take(RELATED_QUERY_PREFIX_CHARS).collect();
    format!("fact check {prefix}")
}
