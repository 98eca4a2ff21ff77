//! OpenAI-compatible chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::GenerationParams;
use super::LlmResponse;
use super::TextGenerator;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::errors::SwaliError;

/// LLM service speaking the `/chat/completions` protocol
pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    params: GenerationParams,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: usize,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

impl LlmService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.llm.endpoint.trim_end_matches('/').to_string(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            params: GenerationParams::from_config(&config.llm),
        })
    }

    /// Parameters taken from the `[llm]` config section
    pub fn default_params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate with a one-off temperature and length
    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<LlmResponse> {
        let params = GenerationParams {
            temperature,
            max_tokens,
            ..self.params.clone()
        };
        self.generate(prompt, &params).await
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<LlmResponse> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| SwaliError::ConfigError("LLM API key not provided".to_string()))?;

        let url = format!("{}/chat/completions", self.endpoint);
        let messages = params.messages(prompt);
        debug!("Calling chat completions API: {} ({} prompt chars)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages: &messages,
                temperature: params.temperature,
                max_tokens: params.max_tokens,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SwaliError::Llm(format!("LLM API error ({status}): {error_text}")));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| SwaliError::Llm(format!("Failed to parse response: {e}")))?;

        let choice = result
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SwaliError::Llm("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content,
            model: result.model.unwrap_or_else(|| self.model.clone()),
            tokens_used: result.usage.map_or(0, |u| u.total_tokens),
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let service = LlmService::new(&AppConfig::default()).unwrap();
        let err = service.generate("hello", service.default_params()).await.unwrap_err();
        assert!(matches!(err, SwaliError::ConfigError(_)));
    }

    #[test]
    fn test_parses_completion_payload() {
        let raw = r#"{
            "model": "gemini-2.0-flash",
            "choices": [{"message": {"role": "assistant", "content": "Use a hash map."}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25}
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Use a hash map.");
        assert_eq!(parsed.usage.unwrap().total_tokens, 25);
    }
}
