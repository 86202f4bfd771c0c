//! Claim analysis orchestration
//!
//! Composes the four LLM-backed text operations (query refinement, claim
//! breakdown, stance classification, summary synthesis) with the literature
//! search client into the two end-to-end workflows.

use std::sync::Arc;

use futures::future::join_all;

use crate::model::{ClaimAnalysis, ClassifiedArticle, ModelsConfig, Stance};
use crate::service::llm::TextCompletion;
use crate::service::pubmed::LiteratureSearch;

pub mod error;
pub mod parse;
pub mod prompts;

pub use error::BreakdownError;

/// Summary used for the terminal no-evidence payload
const NO_RESULTS_SUMMARY: &str = "No relevant articles found on PubMed for this claim.";

/// Summary substituted when synthesis fails
const SUMMARY_FALLBACK: &str = "Could not generate a summary due to an error.";

/// Summary substituted when there is nothing to summarize
const NO_ARTICLES_SUMMARY: &str = "No articles were analyzed.";

/// Service orchestrating claim verification and breakdown
pub struct ClaimAnalysisService {
    search: Arc<dyn LiteratureSearch>,
    llm: Arc<dyn TextCompletion>,
    models: ModelsConfig,
    max_results: usize,
}

impl ClaimAnalysisService {
    pub fn new(
        search: Arc<dyn LiteratureSearch>,
        llm: Arc<dyn TextCompletion>,
        models: ModelsConfig,
        max_results: usize,
    ) -> Self {
        tracing::info!(
            refine_model = %models.refine,
            classify_model = %models.classify,
            breakdown_model = %models.breakdown,
            summarize_model = %models.summarize,
            max_results = max_results,
            "Claim analysis service initialized"
        );
        Self {
            search,
            llm,
            models,
            max_results,
        }
    }

    /// Verify a claim against the literature.
    ///
    /// claim → refined query → id search → abstract fetch → concurrent
    /// per-article stance classification → verdict summary. An empty claim
    /// or an empty search result short-circuits to the terminal payload;
    /// every other step degrades through its documented fallback rather
    /// than failing the request.
    pub async fn verify_claim(&self, claim: &str) -> ClaimAnalysis {
        let claim = claim.trim();
        if claim.is_empty() {
            tracing::debug!("Empty claim, skipping analysis");
            return ClaimAnalysis::NoResults {
                claim_text: String::new(),
                summary: NO_RESULTS_SUMMARY.to_string(),
            };
        }

        let query = self.refine_query(claim).await;
        tracing::info!(query = %query, "Refined claim into search query");

        let pmids = self.search.search(&query, self.max_results).await;
        tracing::info!(id_count = pmids.len(), "PubMed search finished");

        if pmids.is_empty() {
            return ClaimAnalysis::NoResults {
                claim_text: claim.to_string(),
                summary: NO_RESULTS_SUMMARY.to_string(),
            };
        }

        let articles = self.search.fetch_details(&pmids).await;
        tracing::info!(article_count = articles.len(), "Fetched abstracts");

        // One classification task per article, all awaited together.
        // Output order mirrors input order by position.
        let classifications = join_all(
            articles
                .iter()
                .map(|article| self.classify_stance(claim, &article.abstract_text)),
        )
        .await;

        let classified: Vec<ClassifiedArticle> = articles
            .into_iter()
            .zip(classifications)
            .map(|(article, stance)| ClassifiedArticle::new(article, stance))
            .collect();

        let summary = self.synthesize_summary(claim, &classified).await;

        ClaimAnalysis::Evidence {
            summary,
            articles: classified,
        }
    }

    /// Break a broad claim into specific answerable questions.
    ///
    /// Returns `Ok` with an empty list for an empty claim or malformed
    /// model output; transport failures surface as `Err`.
    pub async fn breakdown_claim(&self, claim: &str) -> Result<Vec<String>, BreakdownError> {
        let claim = claim.trim();
        if claim.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = prompts::build_breakdown_prompt(claim);
        let output = self.llm.complete(&self.models.breakdown, &prompt).await?;

        let questions = parse::parse_questions(&output);
        if questions.is_empty() {
            tracing::warn!(
                output_length = output.len(),
                "Claim breakdown produced no well-formed questions"
            );
        }

        Ok(questions)
    }

    /// Refine a claim into a keyword search query, falling back to the
    /// claim text verbatim.
    async fn refine_query(&self, claim: &str) -> String {
        let prompt = prompts::build_refine_prompt(claim);
        match self.llm.complete(&self.models.refine, &prompt).await {
            Ok(output) => {
                let query = output.trim();
                if query.is_empty() {
                    tracing::warn!("Query refinement returned blank output, using claim verbatim");
                    claim.to_string()
                } else {
                    query.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Query refinement failed, using claim verbatim");
                claim.to_string()
            }
        }
    }

    /// Classify one abstract's stance toward the claim, falling back to
    /// `Neutral`.
    async fn classify_stance(&self, claim: &str, abstract_text: &str) -> Stance {
        if claim.is_empty() || abstract_text.is_empty() {
            return Stance::Neutral;
        }

        let prompt = prompts::build_classify_prompt(claim, abstract_text);
        match self.llm.complete(&self.models.classify, &prompt).await {
            Ok(output) => parse::parse_stance(&output),
            Err(e) => {
                tracing::warn!(error = %e, "Stance classification failed, defaulting to NEUTRAL");
                Stance::Neutral
            }
        }
    }

    /// Synthesize the verdict summary, falling back to a fixed message.
    async fn synthesize_summary(&self, claim: &str, articles: &[ClassifiedArticle]) -> String {
        if articles.is_empty() {
            return NO_ARTICLES_SUMMARY.to_string();
        }

        let prompt = prompts::build_summary_prompt(claim, articles);
        match self.llm.complete(&self.models.summarize, &prompt).await {
            Ok(output) => output.trim().to_string(),
            Err(e) => {
                tracing::error!(error = %e, "Summary synthesis failed");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }
}
