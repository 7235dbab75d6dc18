// analysis/types.rs
// Provider error and generation parameters

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_output_tokens: 800,
        }
    }
}

/// LLM adapter errors
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("{provider} returned HTTP {status}: {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{0} rate limit exceeded")]
    RateLimited(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response from LLM: {0}")]
    InvalidResponse(String),

    #[error("No JSON object found in model output")]
    MissingJson,

    #[error("Model JSON rejected: {0}")]
    Parse(String),
}

impl LLMError {
    pub(crate) fn from_reqwest(provider: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LLMError::Timeout
        } else {
            LLMError::NetworkError(format!("{}: {}", provider, e))
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            LLMError::Http { status, .. } => Some(*status),
            LLMError::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}
