//! Hybrid semantic + lexical reranking of nearest-neighbor candidates
//!
//! Vector search is good at recall but often leaves near-misses in the top
//! positions. The reranker re-orders an existing candidate set by
//!
//! ```text
//! score = semantic_weight * (-distance) + lexical_weight * overlap(query, title + " " + text)
//! ```
//!
//! and truncates it to `top_k`. Weights need not sum to 1: scaling both
//! positive weights by the same factor rescales every score and leaves the
//! order unchanged.

use std::collections::HashSet;

use tracing::debug;

use crate::config::RetrievalConfig;
use crate::errors::Result;
use crate::models::Candidate;
use crate::models::QueryResponse;
use crate::rag::scoring::overlap_with_tokens;
use crate::rag::scoring::semantic_score;
use crate::rag::scoring::tokenize;

/// Candidate annotated with the signals that produced its rank
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
    pub semantic: f64,
    pub lexical: f64,
    /// Position in the input sequence
    pub original_rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridReranker {
    semantic_weight: f64,
    lexical_weight: f64,
}

impl Default for HybridReranker {
    fn default() -> Self {
        Self::new(0.7, 0.3)
    }
}

impl HybridReranker {
    pub const fn new(semantic_weight: f64, lexical_weight: f64) -> Self {
        Self {
            semantic_weight,
            lexical_weight,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.semantic_weight, config.lexical_weight)
    }

    pub const fn semantic_weight(&self) -> f64 {
        self.semantic_weight
    }

    pub const fn lexical_weight(&self) -> f64 {
        self.lexical_weight
    }

    /// Combined score of a single candidate
    pub fn score(&self, query: &str, candidate: &Candidate) -> f64 {
        self.score_with_tokens(&tokenize(query), candidate).0
    }

    fn score_with_tokens(
        &self,
        query_tokens: &HashSet<String>,
        candidate: &Candidate,
    ) -> (f64, f64, f64) {
        let semantic = semantic_score(candidate.distance);
        let lexical = overlap_with_tokens(
            query_tokens,
            &format!("{} {}", candidate.title, candidate.text),
        );
        let combined = self.semantic_weight * semantic + self.lexical_weight * lexical;
        (combined, semantic, lexical)
    }

    /// Score every candidate and return the best `top_k`, best first.
    ///
    /// Equal scores keep their input order.
    pub fn rerank_scored(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        top_k: usize,
    ) -> Vec<ScoredCandidate> {
        let query_tokens = tokenize(query);

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .enumerate()
            .map(|(original_rank, candidate)| {
                let (score, semantic, lexical) = self.score_with_tokens(&query_tokens, &candidate);
                ScoredCandidate {
                    candidate,
                    score,
                    semantic,
                    lexical,
                    original_rank,
                }
            })
            .collect();

        // Stable total order: highest score first, NaN scores last
        scored.sort_by(|a, b| {
            a.score
                .is_nan()
                .cmp(&b.score.is_nan())
                .then_with(|| b.score.total_cmp(&a.score))
        });
        scored.truncate(top_k);

        debug!(
            "Reranked to {} candidates (query tokens: {})",
            scored.len(),
            query_tokens.len()
        );
        scored
    }

    /// Reorder candidates by combined score and keep at most `top_k`
    pub fn rerank(&self, query: &str, candidates: Vec<Candidate>, top_k: usize) -> Vec<Candidate> {
        if candidates.is_empty() {
            return candidates;
        }
        self.rerank_scored(query, candidates, top_k)
            .into_iter()
            .map(|scored| scored.candidate)
            .collect()
    }

    /// Rerank a response in the vector index's parallel-array shape
    pub fn rerank_response(
        &self,
        query: &str,
        response: QueryResponse,
        top_k: usize,
    ) -> Result<QueryResponse> {
        response.validate()?;
        if response.is_empty() {
            return Ok(response);
        }
        let candidates = response.into_candidates()?;
        Ok(QueryResponse::from_candidates(
            self.rerank(query, candidates, top_k),
        ))
    }
}
