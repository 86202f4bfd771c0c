//! Shared LLM client and completion seam
//!
//! Provides the single prompt-in, text-out capability every analysis
//! operation is built on.

use async_trait::async_trait;
use rig::completion::Prompt;
use rig::providers::openai;

const MAX_COMPLETION_TOKENS: u64 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Request(String),
}

/// A single prompt-completion round trip against a remote text-generation
/// service. Implementations must be total in `model` and `prompt`; errors
/// are transport or provider failures only.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError>;
}

/// OpenAI-backed LLM client
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Self {
        Self {
            client: openai::Client::new(api_key),
        }
    }
}

#[async_trait]
impl TextCompletion for LlmClient {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        tracing::debug!(
            model = model,
            prompt_length = prompt.len(),
            "Issuing completion request"
        );

        let agent = self
            .client
            .agent(model)
            .max_tokens(MAX_COMPLETION_TOKENS)
            .build();

        let start = std::time::Instant::now();
        let response = agent.prompt(prompt).await.map_err(|e| {
            tracing::error!(
                model = model,
                elapsed_ms = start.elapsed().as_millis() as u64,
                error = %e,
                "Completion request failed"
            );
            CompletionError::Request(e.to_string())
        })?;

        tracing::debug!(
            model = model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            response_length = response.len(),
            "Completion request succeeded"
        );

        Ok(response)
    }
}
