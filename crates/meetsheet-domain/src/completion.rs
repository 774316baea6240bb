//! Completion-service request types
//!
//! These describe what is sent, not how. Providers in `meetsheet-llm` map
//! them onto a concrete wire format.

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instructions
    System,
    /// User request
    User,
    /// Model reply
    Assistant,
}

/// One message of a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: ChatRole,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A request to the external completion service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature; extraction keeps this low
    pub temperature: f32,

    /// Output token ceiling
    pub max_tokens: u32,

    /// Ask the service to constrain output to a JSON object, where supported
    pub json_object: bool,
}

impl CompletionRequest {
    /// Create a request with extraction-friendly defaults
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: 0.1,
            max_tokens: 6000,
            json_object: true,
        }
    }

    /// Total characters across all messages
    pub fn prompt_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content.chars().count()).sum()
    }
}
