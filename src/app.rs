//! Application state and service initialization
//!
//! Centralizes service construction so startup failures are reported
//! before the server binds.

use std::sync::Arc;

use crate::model::Config;
use crate::service::{ClaimAnalysisService, LlmClient, PubMedClient};

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Application state containing all services
pub struct AppState {
    /// Claim verification and breakdown service
    pub analysis_service: Arc<ClaimAnalysisService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// The text-generation API key is required; a missing key is a
    /// startup-time fatal condition. The literature-search API key is
    /// optional and picked up by the PubMed client itself.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = std::env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| AppError::MissingConfig(ENV_OPENAI_API_KEY))?;

        let llm_client = LlmClient::new(&api_key);
        let pubmed_client = PubMedClient::new();

        let analysis_service = Arc::new(ClaimAnalysisService::new(
            Arc::new(pubmed_client),
            Arc::new(llm_client),
            config.models.clone(),
            config.search.max_results,
        ));

        Ok(Self { analysis_service })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),
}
