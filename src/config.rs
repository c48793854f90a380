use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_COMPLETION_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Main configuration struct for the service
///
/// Holds API credentials and endpoint settings. Constructed once at startup
/// and shared as an immutable handle; per-request clients are built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub API token for authenticated requests (optional; unauthenticated
    /// calls are rate-limited lower)
    pub github_token: Option<String>,
    /// Base URL of the GitHub REST API
    pub github_api_base: String,
    /// API key for the completion service (required)
    pub completion_api_key: String,
    /// Chat-completion endpoint URL
    pub completion_url: String,
    /// Model identifier sent with each completion request
    pub model: String,
    /// Token cap for completion requests
    pub max_tokens: u32,
    /// Sampling temperature; kept low for consistent structured output
    pub temperature: f64,
    /// Address the HTTP server binds to
    pub bind_addr: String,
}

impl Config {
    /// Builds the configuration from environment variables
    ///
    /// `GROQ_API_KEY` is required; its absence is a startup-time
    /// configuration error. `GITHUB_TOKEN`, `GITHUB_API_BASE_URL`,
    /// `GROQ_API_URL`, `GROQ_MODEL` and `BIND_ADDR` are optional overrides.
    pub fn from_env() -> Result<Self> {
        let completion_api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| {
                AnalyzerError::Configuration("GROQ_API_KEY environment variable is required".into())
            })?
            .trim()
            .to_string();
        if completion_api_key.is_empty() {
            return Err(AnalyzerError::Configuration("GROQ_API_KEY is empty".into()));
        }

        Ok(Self {
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            github_api_base: std::env::var("GITHUB_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_BASE.to_string()),
            completion_api_key,
            completion_url: std::env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_COMPLETION_URL.to_string()),
            model: std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: 8000,
            temperature: 0.3,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    /// Configuration with default endpoints and the given API key, useful
    /// for tests that point the base URLs at mock servers
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            github_token: None,
            github_api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            completion_api_key: key.into(),
            completion_url: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 8000,
            temperature: 0.3,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}
