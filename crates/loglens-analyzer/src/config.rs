//! LLM provider configuration, read once at process start

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use loglens_core::MAX_LINES;
use thiserror::Error;

use crate::{gemini_client, groq_client, OllamaClient};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown LLM provider '{0}' (expected gemini, groq or ollama)")]
    UnknownProvider(String),

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// LLM Provider selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LlmProvider {
    #[default]
    Gemini,
    Groq,
    Ollama,
}

impl LlmProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.5-flash",
            LlmProvider::Groq => "llama-3.3-70b-versatile",
            LlmProvider::Ollama => "llama3.2:3b",
        }
    }

    // env var holding the credential; ollama runs locally without one
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Gemini => Some(gemini_client::API_KEY_VAR),
            LlmProvider::Groq => Some(groq_client::API_KEY_VAR),
            LlmProvider::Ollama => None,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Groq => "groq",
            LlmProvider::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// `None` is not an error here; the first analysis fails instead.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_lines: usize,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let provider = LlmProvider::default();
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            base_url: None,
            max_lines: MAX_LINES,
            timeout: Duration::from_secs(60),
        }
    }
}

// keep the credential out of logs
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("max_lines", &self.max_lines)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmConfig {
    /// Create from environment variables
    /// - LOGLENS_PROVIDER: gemini | groq | ollama (default: gemini)
    /// - LOGLENS_MODEL: model name (default depends on provider)
    /// - GEMINI_API_KEY / GROQ_API_KEY: credential for the chosen provider
    /// - OLLAMA_URL: Ollama base URL (default: http://localhost:11434)
    /// - LOGLENS_MAX_LINES: line cap per upload (default: 500)
    /// - LOGLENS_LLM_TIMEOUT_SECS: deadline for one model call (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let provider = match get("LOGLENS_PROVIDER") {
            Some(name) => name.parse()?,
            None => LlmProvider::default(),
        };

        let model = get("LOGLENS_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let api_key = provider.api_key_var().and_then(|var| get(var));
        let base_url = match provider {
            LlmProvider::Ollama => Some(get("OLLAMA_URL").unwrap_or_else(|| OllamaClient::DEFAULT_URL.to_string())),
            _ => None,
        };

        let max_lines = match get("LOGLENS_MAX_LINES") {
            Some(v) => parse_positive("LOGLENS_MAX_LINES", &v)? as usize,
            None => defaults.max_lines,
        };
        let timeout = match get("LOGLENS_LLM_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_positive("LOGLENS_LLM_TIMEOUT_SECS", &v)?),
            None => defaults.timeout,
        };

        Ok(Self {
            provider,
            model,
            api_key,
            base_url,
            max_lines,
            timeout,
        })
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
