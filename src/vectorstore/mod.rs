//! Vector index collaborator
//!
//! The retrieval core treats the index as a black-box nearest-neighbor
//! service. Responses cross this boundary in the parallel-array
//! [`QueryResponse`] shape and are converted to candidates right away.

pub mod memory;

use async_trait::async_trait;
pub use memory::InMemoryVectorStore;

use crate::errors::Result;
use crate::models::Document;
use crate::models::QueryResponse;

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Collection name recorded in experiment configs
    fn name(&self) -> &str;

    /// Nearest neighbors of `embedding`, closest first
    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<QueryResponse>;

    /// Every stored document in insertion order
    async fn get_all(&self) -> Result<Vec<Document>>;

    /// Insert or replace documents with precomputed embeddings
    async fn add_with_embeddings(
        &self,
        documents: Vec<Document>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<()>;

    /// Remove everything, returning how many documents were dropped
    async fn delete_all(&self) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}
