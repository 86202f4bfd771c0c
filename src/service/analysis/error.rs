use crate::service::llm::CompletionError;

/// Errors from the claim-breakdown workflow.
///
/// Unlike the other LLM operations this one has no degraded-but-useful
/// fallback for a failed call, so transport failures surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum BreakdownError {
    #[error("Claim breakdown failed: {0}")]
    Completion(#[from] CompletionError),
}
