// analysis/llm/gemini.rs
// Google Gemini adapter (direct API or same-origin proxy)

use super::{ensure_success, LLMAdapter};
use crate::analysis::types::{GenerationParams, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationParams,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    prompt: &'a str,
    config: GenerationParams,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// The proxy either relays Gemini's body untouched or flattens it to `{ "text": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProxyResponse {
    Relayed(GeminiResponse),
    Flat { text: String },
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
    }
}

/// How requests reach Gemini
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeminiTransport {
    /// Call the public API with the key in the query string
    Direct { api_key: String, base_url: String },
    /// POST `{prompt, config}` to a proxy that holds the key
    Proxy { url: String },
}

pub struct GeminiAdapter {
    client: Client,
    transport: GeminiTransport,
    model: String,
    params: GenerationParams,
}

impl GeminiAdapter {
    pub fn new(
        transport: GeminiTransport,
        model: impl Into<String>,
        params: GenerationParams,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            transport,
            model: model.into(),
            params,
        }
    }

    async fn call_direct(
        &self,
        api_key: &str,
        base_url: &str,
        prompt: &str,
    ) -> Result<String, LLMError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            self.model
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: self.params,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::from_reqwest("Gemini", e))?;

        let response = ensure_success("Gemini", response).await?;

        let gemini: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LLMError::InvalidResponse(format!("Gemini parse: {}", e)))?;

        gemini
            .into_text()
            .ok_or_else(|| LLMError::InvalidResponse("Gemini returned no candidates".to_string()))
    }

    async fn call_proxy(&self, url: &str, prompt: &str) -> Result<String, LLMError> {
        let request = ProxyRequest {
            prompt,
            config: self.params,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::from_reqwest("Gemini proxy", e))?;

        let response = ensure_success("Gemini proxy", response).await?;

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|e| LLMError::InvalidResponse(format!("Gemini proxy parse: {}", e)))?;

        match body {
            ProxyResponse::Relayed(gemini) => gemini.into_text().ok_or_else(|| {
                LLMError::InvalidResponse("Gemini proxy returned no candidates".to_string())
            }),
            ProxyResponse::Flat { text } => Ok(text),
        }
    }
}

#[async_trait]
impl LLMAdapter for GeminiAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, LLMError> {
        match &self.transport {
            GeminiTransport::Direct { api_key, base_url } => {
                self.call_direct(api_key, base_url, prompt).await
            }
            GeminiTransport::Proxy { url } => self.call_proxy(url, prompt).await,
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
