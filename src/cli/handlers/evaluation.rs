//! Evaluation, experiment and run-comparison handlers

use std::path::Path;
use std::sync::Arc;

use super::open_collection;
use crate::cli::output::*;
use crate::embeddings::EmbeddingService;
use crate::evaluation::fixtures;
use crate::evaluation::EvaluationCase;
use crate::evaluation::EvaluationRunner;
use crate::evaluation::ExperimentTracker;
use crate::experiments::RetrievalExperimentHarness;
use crate::rag::HybridReranker;
use crate::rag::Retriever;
use crate::vectorstore::VectorIndex;
use crate::AppConfig;
use crate::Result;

fn load_cases(path: Option<&Path>) -> Result<Vec<EvaluationCase>> {
    match path {
        Some(path) => fixtures::load_cases(path),
        None => Ok(fixtures::sample_cases()),
    }
}

pub async fn handle_evaluate_command(
    config: &AppConfig,
    k: usize,
    rerank: bool,
    notes: &str,
    cases_path: Option<&Path>,
) -> Result<()> {
    let cases = load_cases(cases_path)?;
    let store = open_collection(config)?;
    let collection = store.name().to_string();
    let embedder = Arc::new(EmbeddingService::new(config)?);
    let retriever = Retriever::new(embedder, store, &config.retrieval);

    let run = EvaluationRunner::new()
        .evaluate_async(
            &cases,
            |query| {
                let retriever = &retriever;
                async move { retriever.retrieve_ids(&query, rerank, k).await }
            },
            k,
        )
        .await?
        .with_config("collection", collection)
        .with_config("embedding_model", config.embedding_model())
        .with_config("reranker", rerank);

    let tracker = ExperimentTracker::new(&config.storage.experiments_dir)?;
    let path = tracker.log_run(&run, notes)?;

    print_run_summary(&run.run_id, run.summary().as_ref());
    print_success(&format!("Run logged to {}", path.display()));
    Ok(())
}

pub async fn handle_experiments_command(
    config: &AppConfig,
    k: usize,
    model_b: Option<&str>,
    cases_path: Option<&Path>,
) -> Result<()> {
    let cases = load_cases(cases_path)?;
    let embedder = Arc::new(EmbeddingService::new(config)?);
    let model_b = EmbeddingService::for_model(
        config,
        model_b.unwrap_or(&config.embeddings.comparison_model),
    )?;

    let harness = RetrievalExperimentHarness::new(
        embedder.clone(),
        open_collection(config)?,
        ExperimentTracker::new(&config.storage.experiments_dir)?,
    )
    .with_reranker(HybridReranker::from_config(&config.retrieval))
    .with_candidate_pool(config.retrieval.candidate_pool);

    let report = harness
        .run_all(&cases, k, embedder.as_ref(), &model_b)
        .await?;

    print_experiment_report(&report);
    Ok(())
}

pub fn handle_compare_command(config: &AppConfig, run_ids: &[String]) -> Result<()> {
    let tracker = ExperimentTracker::new(&config.storage.experiments_dir)?;
    print_comparison(&tracker.compare_runs(run_ids)?);
    Ok(())
}

pub fn handle_runs_command(config: &AppConfig) -> Result<()> {
    let tracker = ExperimentTracker::new(&config.storage.experiments_dir)?;
    let run_ids = tracker.list_runs()?;
    if run_ids.is_empty() {
        print_info(&format!(
            "No runs logged in {}",
            tracker.output_dir().display()
        ));
        return Ok(());
    }
    for run_id in run_ids {
        if let Some(stored) = tracker.load_run(&run_id)? {
            print_run_summary(&stored.run_id, stored.summary.as_ref());
        }
    }
    Ok(())
}
