// analysis/llm/mod.rs
// LLM adapter trait shared by the remote providers

pub mod gemini;
pub mod groq;

pub use gemini::{GeminiAdapter, GeminiTransport};
pub use groq::GroqAdapter;

use super::types::LLMError;
use async_trait::async_trait;

/// Trait for LLM text generation adapters
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    /// Generate text from prompt
    async fn generate(&self, prompt: &str) -> Result<String, LLMError>;

    /// Provider name
    fn name(&self) -> &str;
}

/// Map a non-2xx response to an error carrying its status.
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, LLMError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        return Err(LLMError::RateLimited(provider.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(LLMError::Http {
        provider: provider.to_string(),
        status: status.as_u16(),
        body,
    })
}
