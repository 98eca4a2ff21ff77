//! Nearest-neighbor retrieval with optional hybrid reranking

use std::sync::Arc;

use tracing::debug;

use crate::config::RetrievalConfig;
use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::models::Candidate;
use crate::rag::HybridReranker;
use crate::vectorstore::VectorIndex;

/// Embeds queries with the same model that embedded the index's documents
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    reranker: HybridReranker,
    candidate_pool: usize,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            reranker: HybridReranker::from_config(config),
            candidate_pool: config.candidate_pool.max(config.top_k),
            top_k: config.top_k,
        }
    }

    #[must_use]
    pub fn with_reranker(mut self, reranker: HybridReranker) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    pub const fn candidate_pool(&self) -> usize {
        self.candidate_pool
    }

    /// Raw nearest neighbors, closest first
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>> {
        debug!("Performing semantic search ({} results): {}", limit, query);

        let embedding = self.embedder.embed(query).await?;
        let response = self.index.query(&embedding, limit).await?;
        response.into_candidates()
    }

    /// Pull `candidate_pool` neighbors and rerank them down to `limit`
    pub async fn search_reranked(&self, query: &str, limit: usize) -> Result<Vec<Candidate>> {
        let pool = self.candidate_pool.max(limit);
        let candidates = self.search(query, pool).await?;
        Ok(self.reranker.rerank(query, candidates, limit))
    }

    /// Ranked ids for an evaluation at cutoff `k`; never fewer than `k` are requested
    pub async fn retrieve_ids(&self, query: &str, rerank: bool, k: usize) -> Result<Vec<String>> {
        let pool = self.candidate_pool.max(k);
        let candidates = if rerank {
            self.search_reranked(query, pool).await?
        } else {
            self.search(query, pool).await?
        };
        Ok(candidates.into_iter().map(|c| c.id).collect())
    }
}
