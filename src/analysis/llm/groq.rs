// analysis/llm/groq.rs
// Groq adapter (OpenAI-compatible chat completions)

use super::{ensure_success, LLMAdapter};
use crate::analysis::types::{GenerationParams, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

const SYSTEM_PROMPT: &str =
    "You are an air quality expert. Always respond with valid JSON only, no markdown formatting.";

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct GroqAdapter {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    params: GenerationParams,
}

impl GroqAdapter {
    pub fn new(
        api_key: String,
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
            api_key,
            url: GROQ_CHAT_URL.to_string(),
            model: model.into(),
            params,
        }
    }

    /// Point the adapter at a different chat-completions endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl LLMAdapter for GroqAdapter {
    async fn generate(&self, prompt: &str) -> Result<String, LLMError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.params.max_output_tokens,
            temperature: self.params.temperature,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::from_reqwest("Groq", e))?;

        let response = ensure_success("Groq", response).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::InvalidResponse(format!("Groq parse: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LLMError::InvalidResponse("Groq returned no choices".to_string()))
    }

    fn name(&self) -> &str {
        "groq"
    }
}
