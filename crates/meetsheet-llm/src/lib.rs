//! Meetsheet Completion Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `meetsheet-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted, deterministic provider for testing
//! - `ChatCompletionProvider`: OpenAI-compatible chat completions over HTTP
//!   (DeepSeek defaults)
//!
//! # Examples
//!
//! ```
//! use meetsheet_llm::MockProvider;
//! use meetsheet_domain::{ChatMessage, CompletionProvider, CompletionRequest};
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new(r#"{"events": []}"#);
//! let request = CompletionRequest::new(vec![ChatMessage::user("parse this")]);
//! let result = provider.complete(&request).await.unwrap();
//! assert_eq!(result, r#"{"events": []}"#);
//! # });
//! ```

#![warn(missing_docs)]

pub mod chat;

use async_trait::async_trait;
use meetsheet_domain::{CompletionProvider, CompletionRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use chat::{ChatCompletionProvider, ProviderConfig};

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The service answered with a non-success status
    #[error("API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as returned
        body: String,
    },

    /// The service answered, but not in the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider misconfiguration (missing credential, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock completion provider for deterministic testing
///
/// Scripted replies are consumed in order; once the script runs out, every
/// call returns the default response. Clones share the script, call count
/// and request log, so a test can hand one clone to the code under test and
/// inspect the other.
///
/// # Examples
///
/// ```
/// use meetsheet_llm::MockProvider;
/// use meetsheet_domain::{ChatMessage, CompletionProvider, CompletionRequest};
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::new("default");
/// provider.push_response("first");
/// provider.push_error("boom");
///
/// let request = CompletionRequest::new(vec![ChatMessage::user("x")]);
/// assert_eq!(provider.complete(&request).await.unwrap(), "first");
/// assert!(provider.complete(&request).await.is_err());
/// assert_eq!(provider.complete(&request).await.unwrap(), "default");
/// assert_eq!(provider.call_count(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a response for the next unanswered call
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.script).push_back(Ok(response.into()));
    }

    /// Queue a failure for the next unanswered call
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.script).push_back(Err(message.into()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"meetInfo": null, "events": []}"#)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;
        lock(&self.requests).push(request.clone());

        match lock(&self.script).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
