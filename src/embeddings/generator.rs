//! Embedding generation service with chunked batch processing

use async_trait::async_trait;
use tracing::debug;
use tracing::info;

use super::client::EmbeddingClient;
use super::client::EmbeddingProvider;
use super::Embedder;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::errors::SwaliError;

/// Service for generating embeddings with one model
pub struct EmbeddingService {
    client: EmbeddingClient,
    batch_size: usize,
}

impl EmbeddingService {
    /// Create the service for the configured primary model
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::for_model(config, &config.embeddings.model)
    }

    /// Same provider and endpoint, different model
    pub fn for_model(config: &AppConfig, model: &str) -> Result<Self> {
        let provider = EmbeddingProvider::parse(&config.embeddings.provider)?;
        let client = EmbeddingClient::new(
            provider,
            model.to_string(),
            config.embeddings.endpoint.clone(),
            config.embeddings.api_key.clone(),
        )?;
        info!("Embedding service ready: {:?} / {}", provider, model);

        Ok(Self {
            client,
            batch_size: config.embeddings.batch_size.max(1),
        })
    }

    pub fn from_client(client: EmbeddingClient, batch_size: usize) -> Self {
        Self {
            client,
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    fn model_name(&self) -> &str {
        self.client.model()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.generate(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for (chunk_idx, chunk) in texts.chunks(self.batch_size).enumerate() {
            debug!(
                "Embedding chunk {} ({} texts) with {}",
                chunk_idx,
                chunk.len(),
                self.model_name()
            );
            let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            let batch = self.client.generate_batch(&refs).await?;
            if batch.len() != chunk.len() {
                return Err(SwaliError::Embedding(format!(
                    "provider returned {} embeddings for {} texts",
                    batch.len(),
                    chunk.len()
                )));
            }
            embeddings.extend(batch);
        }

        Ok(embeddings)
    }
}
