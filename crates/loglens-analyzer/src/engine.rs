// Analysis engine
// Orchestrates: UTF-8 decode -> line cap -> prompt selection -> LLM call -> strict report parse

use std::str::Utf8Error;
use std::sync::Arc;
use std::time::Duration;

use loglens_core::{AnalysisReport, LogExcerpt, ReportError, MAX_LINES};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{LlmConfig, LlmProvider};
use crate::gemini_client::GeminiClient;
use crate::groq_client::GroqClient;
use crate::llm_client::{LlmClient, LlmError};
use crate::ollama_client::OllamaClient;
use crate::prompts::build_prompt;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("server is not configured for analysis: {0}")]
    Configuration(String),

    #[error("uploaded file is not valid UTF-8 text: {0}")]
    InvalidInput(#[from] Utf8Error),

    #[error("LLM call failed: {0}")]
    UpstreamCall(String),

    #[error("LLM returned an invalid report: {0}")]
    UpstreamFormat(#[from] ReportError),
}

/// Payload-free view of [`AnalyzeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    UpstreamCall,
    UpstreamFormat,
}

impl AnalyzeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyzeError::Configuration(_) => ErrorKind::Configuration,
            AnalyzeError::InvalidInput(_) => ErrorKind::InvalidInput,
            AnalyzeError::UpstreamCall(_) => ErrorKind::UpstreamCall,
            AnalyzeError::UpstreamFormat(_) => ErrorKind::UpstreamFormat,
        }
    }

    /// Caused by what the caller sent rather than by the server
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

impl From<LlmError> for AnalyzeError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey(var) => AnalyzeError::Configuration(format!("{} is not set", var)),
            other => AnalyzeError::UpstreamCall(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub max_lines: usize,
    pub timeout: Duration,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            max_lines: MAX_LINES,
            timeout: Duration::from_secs(60),
        }
    }
}

impl From<&LlmConfig> for AnalyzerSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_lines: config.max_lines,
            timeout: config.timeout,
        }
    }
}

/// The analysis gateway. Holds no per-request state.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn LlmClient>,
    settings: AnalyzerSettings,
}

impl Analyzer {
    pub fn new(client: Arc<dyn LlmClient>, settings: AnalyzerSettings) -> Self {
        Self { client, settings }
    }

    /// Build the configured provider. A missing credential is carried
    /// through and reported by the first call to [`Analyzer::analyze`].
    pub fn from_config(config: &LlmConfig) -> Self {
        let client: Arc<dyn LlmClient> = match config.provider {
            LlmProvider::Gemini => {
                let client = GeminiClient::new(config.api_key.clone(), &config.model);
                let client = match &config.base_url {
                    Some(url) => client.with_base_url(url),
                    None => client,
                };
                Arc::new(client)
            }
            LlmProvider::Groq => {
                let client = GroqClient::new(config.api_key.clone(), &config.model);
                let client = match &config.base_url {
                    Some(url) => client.with_base_url(url),
                    None => client,
                };
                Arc::new(client)
            }
            LlmProvider::Ollama => {
                let url = config.base_url.as_deref().unwrap_or(OllamaClient::DEFAULT_URL);
                Arc::new(OllamaClient::new(url, &config.model))
            }
        };

        Self::new(client, AnalyzerSettings::from(config))
    }

    pub fn provider(&self) -> &str {
        self.client.provider()
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Analyse one uploaded log.
    ///
    /// Either a fully valid report comes back or an error does; the model
    /// is called at most once and never for content that is not UTF-8.
    pub async fn analyze(
        &self,
        file_bytes: &[u8],
        query: Option<&str>,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let excerpt = LogExcerpt::from_bytes(file_bytes, self.settings.max_lines)?;

        if excerpt.is_truncated() {
            info!(
                total_lines = excerpt.total_lines(),
                kept_lines = excerpt.kept_lines(),
                "Log truncated before analysis"
            );
        }

        let prompt = build_prompt(excerpt.text(), query);
        debug!(
            mode = ?prompt.mode,
            provider = self.provider(),
            model = self.model(),
            prompt_bytes = prompt.user.len(),
            "Sending log to LLM"
        );

        let raw = tokio::time::timeout(
            self.settings.timeout,
            self.client.generate_json(prompt.system, &prompt.user),
        )
        .await
        .map_err(|_| {
            AnalyzeError::UpstreamCall(format!("no response within {:?}", self.settings.timeout))
        })??;

        let report = AnalysisReport::from_model_output(&raw)?;

        let counts = report.count_by_kind();
        info!(
            mode = ?prompt.mode,
            anomalies = report.anomalies.len(),
            errors = counts.error,
            warnings = counts.warning,
            "Analysis complete"
        );

        Ok(report)
    }
}
