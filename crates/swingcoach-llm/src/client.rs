use crate::types::ChatTurn;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,

    #[error("chat completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed chat completion response: {0}")]
    MalformedResponse(String),
}

/// Chat-completion endpoint settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// OpenAI-compatible `/chat/completions` URL
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Whole-request timeout, connect through body
    pub timeout: Duration,
}

impl LlmConfig {
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }

    /// Defaults plus the API key from the environment
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
            ..Self::new()
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<ChatTurn, LlmError>> + Send + 'a>>;

/// Chat-completion collaborator: ordered turns in, next assistant turn out
pub trait ChatCompletion: Send + Sync {
    fn complete<'a>(&'a self, turns: &'a [ChatTurn]) -> ChatFuture<'a>;
}

/// HTTP client for OpenAI-compatible chat-completion APIs (Groq by default)
pub struct ChatClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn send(&self, turns: &[ChatTurn]) -> Result<ChatTurn, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;

        tracing::debug!(model = %self.config.model, turns = turns.len(), "requesting chat completion");

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&build_request_body(&self.config.model, turns))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = api_error_message(&body);
            tracing::warn!(status = status.as_u16(), %message, "chat completion rejected");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }
        parse_completion(&body)
    }
}

impl ChatCompletion for ChatClient {
    fn complete<'a>(&'a self, turns: &'a [ChatTurn]) -> ChatFuture<'a> {
        Box::pin(self.send(turns))
    }
}

pub fn build_request_body(model: &str, turns: &[ChatTurn]) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": turns,
    })
}

/// Extract `choices[0].message.content` as an assistant turn
pub fn parse_completion(body: &str) -> Result<ChatTurn, LlmError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
    let content = value["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            LlmError::MalformedResponse("missing choices[0].message.content".to_string())
        })?;
    Ok(ChatTurn::assistant(content))
}

/// Prefer the API's `error.message`, fall back to the raw body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
