//! Normalized request and response shapes shared by every call site and backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(MessageRole::System),
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Generation controls. `None` means "use the backend default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling temperature, `0.0..=2.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Ask the backend for strict JSON output.
    #[serde(default)]
    pub json_mode: bool,
}

/// A conversation plus generation controls.
///
/// Message order is the literal conversation history and is preserved into
/// every backend payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            options: GenerationOptions::default(),
        }
    }

    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::system(content));
        self
    }

    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(content));
        self
    }

    pub fn assistant(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::assistant(content));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.options.json_mode = true;
        self
    }

    /// Check the request before any backend sees it.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.messages.is_empty() {
            return Err(RequestError::EmptyMessages);
        }
        if let Some(temperature) = self.options.temperature {
            if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
                return Err(RequestError::InvalidTemperature(temperature));
            }
        }
        if self.options.max_tokens == Some(0) {
            return Err(RequestError::ZeroMaxTokens);
        }
        Ok(())
    }
}

/// Input-contract violations detected before routing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("request must contain at least one message")]
    EmptyMessages,
    #[error("temperature {0} is outside 0.0..=2.0")]
    InvalidTemperature(f32),
    #[error("max_tokens must be greater than zero")]
    ZeroMaxTokens,
    #[error("{0}")]
    Other(String),
}

/// Normalized output of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Generated text. May be empty on degenerate output.
    pub content: String,
    /// Identifier of the backend that served the call.
    pub provider: String,
    /// Model that was requested from the backend.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    pub latency_ms: u64,
    /// Reserved for a response cache; always `false` today.
    #[serde(default)]
    pub cached: bool,
}

impl GenerationResponse {
    pub fn new(
        content: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            provider: provider.into(),
            model: model.into(),
            tokens_used: None,
            latency_ms: 0,
            cached: false,
        }
    }

    pub fn with_tokens(mut self, tokens: Option<u32>) -> Self {
        self.tokens_used = tokens;
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}
