// Groq Cloud LLM client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm_client::{api_error, LlmClient, LlmError};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
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
    content: Option<String>,
}

impl GroqClient {
    const BASE_URL: &'static str = "https://api.groq.com/openai/v1";

    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request<'a>(&'a self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
            max_tokens: 2048,
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn generate_json(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey(API_KEY_VAR))?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&self.build_request(system, prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let result: ChatResponse = response.json().await?;
        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "groq"
    }
}
