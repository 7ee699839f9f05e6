// LLM client abstraction
// Every provider takes the system instruction per call and is asked for JSON output

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("model returned no text")]
    EmptyResponse,
}

/// A text-generation backend constrained to JSON output.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one generation with `system` as the system-level directive and
    /// `prompt` as the user turn. Returns the raw text of the reply.
    async fn generate_json(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    fn model(&self) -> &str;

    fn provider(&self) -> &str;
}

// Shared by the providers: pull an error body out of a non-2xx reply
pub(crate) async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    LlmError::ApiError(format!("{}: {}", status, body.trim()))
}
