pub mod analysis;
pub mod llm;
pub mod pubmed;

pub use analysis::ClaimAnalysisService;
pub use llm::LlmClient;
pub use pubmed::PubMedClient;
