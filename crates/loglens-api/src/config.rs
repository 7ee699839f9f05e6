//! Server configuration, read once from the environment at startup

use loglens_analyzer::LlmConfig;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173,http://localhost:3000";
const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Llm(#[from] loglens_analyzer::ConfigError),

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // address to bind, host:port
    pub addr: String,

    // browser origins allowed to call the API
    pub cors_origins: Vec<String>,

    // request body cap for uploads
    pub max_upload_bytes: usize,

    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    /// - LOGLENS_ADDR (default: 0.0.0.0:8000)
    /// - LOGLENS_CORS_ORIGINS: comma separated (default: local dev front-end ports)
    /// - LOGLENS_MAX_UPLOAD_MB (default: 10)
    /// plus everything [`LlmConfig::from_env`] reads
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = get("LOGLENS_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let cors_origins = split_origins(&get("LOGLENS_CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()));

        let max_upload_mb = match get("LOGLENS_MAX_UPLOAD_MB") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    var: "LOGLENS_MAX_UPLOAD_MB",
                    value: value.clone(),
                })?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        let llm = LlmConfig::from_lookup(&lookup)?;

        Ok(Self {
            addr,
            cors_origins,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            llm,
        })
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}
