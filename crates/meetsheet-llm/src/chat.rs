//! Chat Completion Provider Implementation
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. Defaults
//! target DeepSeek, which accepts the `json_object` response format.
//!
//! # Features
//!
//! - Bearer-token authentication
//! - Per-request timeout
//! - Retry with exponential backoff on transport failures, rate limiting and
//!   server errors; client errors are returned immediately
//!
//! # Examples
//!
//! ```no_run
//! use meetsheet_llm::{ChatCompletionProvider, ProviderConfig};
//!
//! let provider = ChatCompletionProvider::new("sk-...", ProviderConfig::default()).unwrap();
//! ```

use crate::LlmError;
use async_trait::async_trait;
use meetsheet_domain::{ChatMessage, CompletionProvider, CompletionRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Default timeout for completion requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff before the second attempt (milliseconds); doubles per attempt
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;

/// Connection settings for a chat-completion endpoint.
///
/// The credential is deliberately not part of this struct so it is never
/// written out with the rest of the settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff before the second attempt (milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl ProviderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        Ok(())
    }
}

/// OpenAI-compatible chat-completion provider
pub struct ChatCompletionProvider {
    api_key: String,
    config: ProviderConfig,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Outcome of one HTTP attempt
enum Attempt {
    Done(Result<String, LlmError>),
    Retry(LlmError),
}

impl ChatCompletionProvider {
    /// Create a provider with an explicit credential
    pub fn new(api_key: impl Into<String>, config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }
        config.validate().map_err(LlmError::Config)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    /// Create a provider reading the credential from `DEEPSEEK_API_KEY`
    pub fn from_env(config: ProviderConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| LlmError::Config(format!("{} not set", API_KEY_ENV)))?;
        Self::new(api_key, config)
    }

    /// Provider settings
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionBody<'a> {
        ChatCompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_object.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    async fn attempt(&self, body: &ChatCompletionBody<'_>) -> Attempt {
        let response = match self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return Attempt::Retry(LlmError::Communication(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Attempt::Retry(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let error = LlmError::Api {
                status: status.as_u16(),
                body,
            };
            return if status.is_server_error() {
                Attempt::Retry(error)
            } else {
                Attempt::Done(Err(error))
            };
        }

        let parsed = match response.json::<ChatCompletionResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return Attempt::Done(Err(LlmError::InvalidResponse(format!(
                    "Failed to parse response: {}",
                    e
                ))));
            }
        };

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty());

        Attempt::Done(content.ok_or_else(|| {
            LlmError::InvalidResponse("No content in API response".to_string())
        }))
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let body = self.body(request);

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            match self.attempt(&body).await {
                Attempt::Done(result) => {
                    if let Ok(content) = &result {
                        debug!("Completion returned {} chars", content.len());
                    }
                    return result;
                }
                Attempt::Retry(error) => {
                    warn!("Completion attempt {} failed: {}", attempts + 1, error);
                    last_error = Some(error);
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc. with the default base
                let delay =
                    Duration::from_millis(self.config.retry_backoff_ms * 2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
