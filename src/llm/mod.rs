//! Text generation behind the [`TextGenerator`] trait
//!
//! - [`client`]: `LlmService`, an OpenAI-compatible chat completions client
//! - [`retry`]: exponential backoff around any generator

pub mod client;
pub mod retry;

use async_trait::async_trait;
pub use client::LlmService;
pub use retry::generate_with_retry;
pub use retry::RetryPolicy;
use serde::Deserialize;
use serde::Serialize;

use crate::config::LlmConfig;
use crate::errors::Result;

/// Used when the caller does not set a system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful coding interview coach. Be concise and educational.";

/// Chat message for OpenAI-compatible APIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters for one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: usize,
    pub system_prompt: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
            system_prompt: None,
        }
    }
}

impl GenerationParams {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: None,
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn messages(&self, prompt: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                self.system_prompt
                    .as_deref()
                    .unwrap_or(DEFAULT_SYSTEM_PROMPT),
            ),
            ChatMessage::user(prompt),
        ]
    }
}

/// Generated text plus accounting metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub tokens_used: u32,
    /// e.g. `stop`, `length`
    pub finish_reason: String,
}

/// Black-box prompt → text function
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<LlmResponse>;
}
