// LogLens analyzer - sends uploaded logs to an LLM and validates the report it returns

pub mod config;
pub mod engine;
pub mod gemini_client;
pub mod groq_client;
pub mod llm_client;
pub mod ollama_client;
pub mod prompts;

pub use config::{ConfigError, LlmConfig, LlmProvider};
pub use engine::{AnalyzeError, Analyzer, AnalyzerSettings, ErrorKind};
pub use gemini_client::GeminiClient;
pub use groq_client::GroqClient;
pub use llm_client::{LlmClient, LlmError};
pub use ollama_client::OllamaClient;
pub use prompts::{build_prompt, Prompt, PromptMode};
