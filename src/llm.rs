use crate::config::Config;
use crate::error::{AnalyzerError, Result, Service};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Default number of additional attempts after the first request
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client for the hosted chat-completion endpoint
///
/// Stateless per request; retries apply only here, never to GitHub fetches.
pub struct CompletionClient {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl CompletionClient {
    pub fn new(config: &Config) -> Result<Self> {
        if config.completion_api_key.trim().is_empty() {
            return Err(AnalyzerError::Configuration(
                "completion API key is required".into(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key: config.completion_api_key.clone(),
            url: config.completion_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Sends one chat completion and extracts a JSON payload from the reply
    ///
    /// Retries with exponential backoff (`2^attempt` seconds) on HTTP 429 and
    /// on transport timeouts, up to `max_retries` additional attempts. A 401
    /// is a configuration fault and is never retried. JSON-extraction
    /// failures surface immediately without retry.
    pub async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_retries: u32,
    ) -> Result<Value> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let mut attempt: u32 = 0;
        loop {
            let response = match self
                .client
                .post(&self.url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    if attempt < max_retries {
                        warn!("completion request timed out, retrying");
                        attempt += 1;
                        continue;
                    }
                    return Err(AnalyzerError::Timeout);
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();
            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    if attempt < max_retries {
                        let delay = Duration::from_secs(1 << attempt);
                        warn!("completion API rate limited, backing off {delay:?}");
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(AnalyzerError::RateLimited {
                        service: Service::Completion,
                        message: "rate limit exceeded, please try again later".into(),
                    });
                }
                StatusCode::UNAUTHORIZED => {
                    return Err(AnalyzerError::Configuration(
                        "invalid completion API key".into(),
                    ));
                }
                _ if !status.is_success() => {
                    let body = response.text().await.unwrap_or_default();
                    warn!("completion API returned {status}: {body}");
                    return Err(AnalyzerError::Upstream {
                        status: status.as_u16(),
                        body,
                    });
                }
                _ => {
                    let data: Value = response.json().await?;
                    let content = data["choices"][0]["message"]["content"]
                        .as_str()
                        .ok_or_else(|| {
                            AnalyzerError::MalformedResponse(
                                "completion reply carries no message content".into(),
                            )
                        })?;
                    info!("completion received ({} chars)", content.len());
                    return extract_json(content);
                }
            }
        }
    }
}

/// One extraction strategy: `None` means "not applicable, try the next one";
/// `Some(Err)` means the strategy matched but the payload is unusable
type Strategy = fn(&str) -> Option<Result<Value>>;

/// Ordered fallback chain, tried in sequence
///
/// The upstream model is not guaranteed to honor the "JSON only"
/// instruction, so the client degrades gracefully rather than rejecting
/// valid-but-wrapped answers.
const STRATEGIES: &[Strategy] = &[
    parse_direct,
    wrap_chat_answer,
    parse_json_fence,
    parse_any_fence,
];

/// Extracts a JSON payload from the model's free-text reply
pub fn extract_json(text: &str) -> Result<Value> {
    for strategy in STRATEGIES {
        if let Some(result) = strategy(text) {
            return result;
        }
    }
    Ok(json!({ "answer": text }))
}

/// 1. The whole text is already valid JSON
fn parse_direct(text: &str) -> Option<Result<Value>> {
    serde_json::from_str(text).ok().map(Ok)
}

/// 2. Chat-style replies mentioning "answer"/"text" are wrapped verbatim
fn wrap_chat_answer(text: &str) -> Option<Result<Value>> {
    if text.contains("answer") || text.contains("text") {
        Some(Ok(json!({ "answer": text })))
    } else {
        None
    }
}

/// 3. First ```json fenced region
fn parse_json_fence(text: &str) -> Option<Result<Value>> {
    let region = fenced_region(text, "```json")?;
    Some(parse_fenced(region))
}

/// 4. First ``` fenced region of any kind
fn parse_any_fence(text: &str) -> Option<Result<Value>> {
    let region = fenced_region(text, "```")?;
    Some(parse_fenced(region))
}

fn fenced_region<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let after_open = &text[text.find(opener)? + opener.len()..];
    let end = after_open.find("```").unwrap_or(after_open.len());
    Some(after_open[..end].trim())
}

fn parse_fenced(region: &str) -> Result<Value> {
    serde_json::from_str(region).map_err(|e| {
        AnalyzerError::MalformedResponse(format!("fenced block is not valid JSON: {e}"))
    })
}
