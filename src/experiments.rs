//! Retrieval experiments: reranker on/off and embedding model A/B
//!
//! Every run is evaluated on the same cases and logged through the tracker.
//! Embedding comparisons re-embed the whole corpus per model, so queries are
//! always embedded in the same space as the documents they are matched
//! against.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::errors::SwaliError;
use crate::evaluation::EvaluationCase;
use crate::evaluation::EvaluationRun;
use crate::evaluation::EvaluationRunner;
use crate::evaluation::ExperimentTracker;
use crate::evaluation::RunSummary;
use crate::rag::HybridReranker;
use crate::vectorstore::InMemoryVectorStore;
use crate::vectorstore::VectorIndex;

pub const EMBED_A_COLLECTION: &str = "exp_embed_a";
pub const EMBED_B_COLLECTION: &str = "exp_embed_b";

/// One logged run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub run_id: String,
    pub experiment: String,
    pub path: PathBuf,
    pub summary: Option<RunSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub entries: Vec<ReportEntry>,
}

impl ExperimentReport {
    pub fn run_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.run_id.as_str()).collect()
    }
}

pub struct RetrievalExperimentHarness {
    /// Model the source index was built with
    embedder: Arc<dyn Embedder>,
    source_index: Arc<dyn VectorIndex>,
    reranker: HybridReranker,
    runner: EvaluationRunner,
    tracker: ExperimentTracker,
    /// Ids pulled per query; metrics cut to `k` themselves
    candidate_pool: usize,
}

impl RetrievalExperimentHarness {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        source_index: Arc<dyn VectorIndex>,
        tracker: ExperimentTracker,
    ) -> Self {
        Self {
            embedder,
            source_index,
            reranker: HybridReranker::default(),
            runner: EvaluationRunner::new(),
            tracker,
            candidate_pool: crate::config::default_candidate_pool(),
        }
    }

    #[must_use]
    pub fn with_reranker(mut self, reranker: HybridReranker) -> Self {
        self.reranker = reranker;
        self
    }

    #[must_use]
    pub fn with_candidate_pool(mut self, candidate_pool: usize) -> Self {
        self.candidate_pool = candidate_pool;
        self
    }

    pub fn tracker(&self) -> &ExperimentTracker {
        &self.tracker
    }

    /// Baseline vector retrieval vs. the same candidates reranked
    pub async fn run_reranker_comparison(
        &self,
        cases: &[EvaluationCase],
        k: usize,
    ) -> Result<Vec<ReportEntry>> {
        let pool = self.candidate_pool.max(k);
        let embedder = self.embedder.as_ref();
        let index = self.source_index.as_ref();
        let collection = index.name().to_string();
        let model = embedder.model_name().to_string();

        let baseline = self
            .runner
            .evaluate_async(
                cases,
                |query| ranked_ids(embedder, index, None, query, pool),
                k,
            )
            .await?
            .with_config("experiment", "baseline_retrieval")
            .with_config("collection", collection.clone())
            .with_config("embedding_model", model.clone())
            .with_config("reranker", false);
        let baseline = self.log(baseline, "Baseline vector retrieval")?;

        let reranker = &self.reranker;
        let reranked = self
            .runner
            .evaluate_async(
                cases,
                |query| ranked_ids(embedder, index, Some(reranker), query, pool),
                k,
            )
            .await?
            .with_config("experiment", "reranked_retrieval")
            .with_config("collection", collection)
            .with_config("embedding_model", model)
            .with_config("reranker", true)
            .with_config(
                "weights",
                json!({
                    "semantic": reranker.semantic_weight(),
                    "lexical": reranker.lexical_weight(),
                }),
            );
        let reranked = self.log(reranked, "Hybrid semantic+lexical reranking")?;

        Ok(vec![baseline, reranked])
    }

    /// Re-embed every document of the source index with `embedder`
    pub async fn build_model_specific_collection(
        &self,
        embedder: &dyn Embedder,
        collection_name: &str,
    ) -> Result<Arc<dyn VectorIndex>> {
        let documents = self.source_index.get_all().await?;
        if documents.is_empty() {
            return Err(SwaliError::InvalidInput(format!(
                "source collection '{}' is empty, ingest the corpus first",
                self.source_index.name()
            )));
        }

        info!(
            "Re-embedding {} documents into '{}' with {}",
            documents.len(),
            collection_name,
            embedder.model_name()
        );
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let target = InMemoryVectorStore::new(collection_name);
        target.delete_all().await?;
        target.add_with_embeddings(documents, embeddings).await?;
        Ok(Arc::new(target))
    }

    /// Same cases against two corpora, each embedded by its own model
    pub async fn run_embedding_comparison(
        &self,
        cases: &[EvaluationCase],
        k: usize,
        model_a: &dyn Embedder,
        model_b: &dyn Embedder,
    ) -> Result<Vec<ReportEntry>> {
        let mut entries = Vec::with_capacity(2);
        for (variant, suffix, collection, embedder) in [
            ("A", "_embedA", EMBED_A_COLLECTION, model_a),
            ("B", "_embedB", EMBED_B_COLLECTION, model_b),
        ] {
            let index = self
                .build_model_specific_collection(embedder, collection)
                .await?;
            entries.push(
                self.evaluate_variant(cases, k, variant, suffix, embedder, index.as_ref())
                    .await?,
            );
        }
        Ok(entries)
    }

    async fn evaluate_variant(
        &self,
        cases: &[EvaluationCase],
        k: usize,
        variant: &str,
        suffix: &str,
        embedder: &dyn Embedder,
        index: &dyn VectorIndex,
    ) -> Result<ReportEntry> {
        let pool = self.candidate_pool.max(k);
        let run = self
            .runner
            .evaluate_async(
                cases,
                |query| ranked_ids(embedder, index, None, query, pool),
                k,
            )
            .await?
            .with_suffix(suffix)
            .with_config("experiment", "embedding_ab")
            .with_config("variant", variant)
            .with_config("embedding_model", embedder.model_name())
            .with_config("collection", index.name());
        self.log(run, &format!("Embedding model {variant}"))
    }

    /// All four runs: baseline, reranked, embedding A, embedding B
    pub async fn run_all(
        &self,
        cases: &[EvaluationCase],
        k: usize,
        model_a: &dyn Embedder,
        model_b: &dyn Embedder,
    ) -> Result<ExperimentReport> {
        let mut entries = self.run_reranker_comparison(cases, k).await?;
        entries.extend(
            self.run_embedding_comparison(cases, k, model_a, model_b)
                .await?,
        );
        info!("Logged {} experiment runs", entries.len());
        Ok(ExperimentReport { entries })
    }

    fn log(&self, run: EvaluationRun, notes: &str) -> Result<ReportEntry> {
        let path = self.tracker.log_run(&run, notes)?;
        let experiment = run
            .config
            .get("experiment")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(ReportEntry {
            summary: run.summary(),
            run_id: run.run_id,
            experiment,
            path,
        })
    }
}

async fn ranked_ids(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    reranker: Option<&HybridReranker>,
    query: String,
    pool: usize,
) -> Result<Vec<String>> {
    let embedding = embedder.embed(&query).await?;
    let mut candidates = index.query(&embedding, pool).await?.into_candidates()?;
    if let Some(reranker) = reranker {
        candidates = reranker.rerank(&query, candidates, pool);
    }
    Ok(candidates.into_iter().map(|c| c.id).collect())
}
