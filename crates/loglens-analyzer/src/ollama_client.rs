// Ollama Local LLM client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm_client::{api_error, LlmClient, LlmError};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    format: &'static str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub const DEFAULT_URL: &'static str = "http://localhost:11434";

    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn build_request<'a>(&'a self, system: &'a str, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            system,
            prompt,
            format: "json",
            stream: false,
            options: GenerateOptions {
                temperature: 0.2,
                // 500 log lines do not fit the 2k default
                num_ctx: 16384,
            },
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate_json(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(system, prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let result: GenerateResponse = response.json().await?;
        if result.response.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(result.response)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new("http://localhost:11434/", "llama3.2:3b");
        assert_eq!(client.model(), "llama3.2:3b");
        assert_eq!(client.provider(), "ollama");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_request_uses_json_format() {
        let client = OllamaClient::new(OllamaClient::DEFAULT_URL, "llama3.2:3b");
        let body = serde_json::to_value(client.build_request("sys", "logs")).unwrap();
        assert_eq!(body["format"], "json");
        assert_eq!(body["system"], "sys");
        assert_eq!(body["stream"], false);
    }
}
