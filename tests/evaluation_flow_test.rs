mod common;

use std::sync::Arc;

use common::*;
use swali::evaluation::EvaluationCase;
use swali::evaluation::EvaluationRunner;
use swali::evaluation::ExperimentTracker;
use swali::ingest;
use swali::rag::Retriever;
use swali::vectorstore::InMemoryVectorStore;
use swali::vectorstore::VectorIndex;
use swali::AppConfig;
use swali::Result;
use swali::SwaliError;

const PROBLEMS_JSON: &str = r#"[
  {"title": "Two Sum", "difficulty": "easy", "pattern": "arrays_hashing",
   "description": "Return indices of the two numbers that add up to target using a hash map.",
   "source": "neetcode"},
  {"title": "two  sum", "description": "duplicate entry", "source": "other"},
  {"title": "Linked List Cycle", "difficulty": "easy", "pattern": "linked_list",
   "description": "Detect whether a linked list has a cycle with fast and slow pointers.",
   "source": "neetcode"},
  {"id": "sd_rate_limiter", "title": "Rate Limiter", "type": "system_design", "difficulty": "hard",
   "description": "Design a distributed rate limiter with token buckets.",
   "source": "system_design"}
]"#;

#[tokio::test]
async fn test_ingest_index_evaluate_and_log() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let corpus_path = dir.path().join("problems.json");
    std::fs::write(&corpus_path, PROBLEMS_JSON)?;

    let documents = ingest::prepare_documents(&[&corpus_path])?;
    assert_eq!(documents.len(), 3);
    let two_sum_id = documents[0].id.clone();
    let cycle_id = documents[1].id.clone();
    assert_eq!(documents[2].id, "sd_rate_limiter");

    let embedder = Arc::new(BagOfWordsEmbedder::new("test-embed", 512));
    let store = Arc::new(InMemoryVectorStore::new("problems"));
    let indexed = ingest::index_corpus(documents, embedder.as_ref(), store.as_ref(), 2).await?;
    assert_eq!(indexed, 3);
    assert_eq!(store.count().await?, 3);

    let config = AppConfig::default();
    let retriever = Retriever::new(embedder, store, &config.retrieval);
    let cases = vec![
        EvaluationCase::new("two sum hash map target", [two_sum_id.as_str()]),
        EvaluationCase::new("linked list cycle pointers", [cycle_id.as_str()]),
        EvaluationCase::new("distributed rate limiter token buckets", ["sd_rate_limiter"]),
    ];

    let run = EvaluationRunner::new()
        .evaluate_async(
            &cases,
            |query| {
                let retriever = &retriever;
                async move { retriever.retrieve_ids(&query, true, 1).await }
            },
            1,
        )
        .await?
        .with_config("reranker", true);

    let summary = run.summary().unwrap();
    assert_eq!(summary.num_cases, 3);
    assert_eq!(summary.avg_recall, 1.0);
    assert_eq!(summary.avg_mrr, 1.0);

    let tracker = ExperimentTracker::new(dir.path().join("runs"))?;
    tracker.log_run(&run, "end to end")?;
    let err = tracker.log_run(&run, "again").unwrap_err();
    assert!(matches!(err, SwaliError::RunAlreadyLogged(_)));

    let stored = tracker.load_run(&run.run_id)?.unwrap();
    assert_eq!(stored.notes, "end to end");
    assert_eq!(stored.config["reranker"], true);
    assert_eq!(stored.results.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_retrieval_failure_aborts_evaluation() {
    let config = AppConfig::default();
    let retriever = Retriever::new(
        Arc::new(BagOfWordsEmbedder::new("test-embed", 8)),
        Arc::new(OfflineIndex),
        &config.retrieval,
    );

    let result = EvaluationRunner::new()
        .evaluate_async(
            &cases(),
            |query| {
                let retriever = &retriever;
                async move { retriever.retrieve_ids(&query, false, 5).await }
            },
            5,
        )
        .await;

    assert!(matches!(result, Err(SwaliError::Retrieval(_))));
}
