//! Embedding API clients for various providers

use std::time::Duration;

use futures::stream::StreamExt;
use futures::stream::{
    self,
};
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::errors::SwaliError;

/// Concurrent in-flight requests when a provider has no batch endpoint
const OLLAMA_CONCURRENCY: usize = 16;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// `OpenAI`-compatible embeddings API (`/embeddings`)
    OpenAI,
    /// Ollama local embeddings (`/api/embeddings`)
    Ollama,
}

impl EmbeddingProvider {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(SwaliError::ConfigError(format!(
                "unknown embedding provider '{other}'"
            ))),
        }
    }
}

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub const fn provider(&self) -> EmbeddingProvider {
        self.provider
    }

    /// Generate embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            EmbeddingProvider::OpenAI => self
                .generate_batch_openai(&[text])
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| SwaliError::Embedding("No embedding in response".to_string())),
            EmbeddingProvider::Ollama => self.generate_ollama(text).await,
        }
    }

    /// Generate embeddings for multiple texts, preserving input order
    pub async fn generate_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        match self.provider {
            EmbeddingProvider::OpenAI => self.generate_batch_openai(texts).await,
            EmbeddingProvider::Ollama => {
                // Ollama has no batch endpoint; `buffered` keeps order
                let concurrency = texts.len().clamp(1, OLLAMA_CONCURRENCY);
                let owned: Vec<String> = texts.iter().map(|t| (*t).to_string()).collect();
                let results: Vec<Result<Vec<f32>>> = stream::iter(owned)
                    .map(|text| async move { self.generate_ollama(&text).await })
                    .buffered(concurrency)
                    .collect()
                    .await;

                results.into_iter().collect()
            }
        }
    }

    /// Generate embeddings in batch using `OpenAI` API
    async fn generate_batch_openai(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| SwaliError::ConfigError("OpenAI API key not provided".to_string()))?;

        #[derive(Serialize)]
        struct OpenAIBatchRequest<'a> {
            input: &'a [&'a str],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI batch embeddings API: {} items", texts.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&OpenAIBatchRequest {
                input: texts,
                model: &self.model,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SwaliError::Embedding(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let mut result: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| SwaliError::Embedding(format!("Failed to parse response: {e}")))?;

        if result.data.len() != texts.len() {
            return Err(SwaliError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                result.data.len()
            )));
        }
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&OllamaRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SwaliError::Embedding(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| SwaliError::Embedding(format!("Failed to parse response: {e}")))?;

        Ok(result.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!(EmbeddingProvider::parse("ollama").unwrap(), EmbeddingProvider::Ollama);
        assert_eq!(EmbeddingProvider::parse("openai").unwrap(), EmbeddingProvider::OpenAI);
        assert!(EmbeddingProvider::parse("cohere").is_err());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Ollama,
            "all-minilm".to_string(),
            "http://localhost:11434/".to_string(),
            None,
        )
        .unwrap();
        assert_eq!(client.endpoint, "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_openai_without_key_is_config_error() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::OpenAI,
            "text-embedding-3-small".to_string(),
            "https://api.openai.com/v1".to_string(),
            None,
        )
        .unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, SwaliError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_ollama_batch_runs_on_spawned_task() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Ollama,
            "all-minilm".to_string(),
            "http://127.0.0.1:9".to_string(),
            None,
        )
        .unwrap();

        // tokio::spawn requires the batch future to be Send
        let handle = tokio::spawn(async move { client.generate_batch(&["two sum", "cycle"]).await });
        let err = handle.await.unwrap().unwrap_err();

        assert!(err.is_backend_error());
    }

    #[tokio::test]
    #[ignore = "Requires a running Ollama server"]
    async fn test_ollama_embedding() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Ollama,
            "all-minilm".to_string(),
            "http://localhost:11434".to_string(),
            None,
        )
        .unwrap();

        let embedding = client.generate("Hello, world!").await.unwrap();
        assert!(!embedding.is_empty());
    }
}
