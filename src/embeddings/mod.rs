//! Embeddings generation module
//!
//! The rest of the crate only sees the [`Embedder`] trait. Concrete HTTP
//! clients live here:
//! - OpenAI-compatible `/embeddings` endpoints
//! - Ollama (local models)
//!
//! # Examples
//!
//! ```rust,no_run
//! use swali::config::AppConfig;
//! use swali::embeddings::Embedder;
//! use swali::embeddings::EmbeddingService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.embed("Two Sum with a hash map").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;

use async_trait::async_trait;
pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;

use crate::errors::Result;

/// Black-box text → vector function
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier recorded in experiment configs
    fn model_name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts; output order matches input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }
}
