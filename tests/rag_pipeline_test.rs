mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use swali::llm::RetryPolicy;
use swali::rag::HintLevel;
use swali::rag::PromptKind;
use swali::rag::PromptVersion;
use swali::rag::RagService;
use swali::rag::Retriever;
use swali::vectorstore::InMemoryVectorStore;
use swali::AppConfig;
use swali::Result;
use swali::SwaliError;

const NO_WAIT: RetryPolicy = RetryPolicy::new(3, Duration::ZERO, Duration::ZERO);

async fn service(generator: Arc<ScriptedGenerator>) -> RagService {
    let config = AppConfig::default();
    let embedder = Arc::new(BagOfWordsEmbedder::new("test-embed", 256));
    let store = indexed_store("problems", embedder.as_ref()).await;
    let retriever = Retriever::new(embedder, store, &config.retrieval);
    RagService::from_services(retriever, generator, &config).with_retry_policy(NO_WAIT)
}

#[tokio::test]
async fn test_answer_grounds_on_retrieved_problems() -> Result<()> {
    let generator = Arc::new(ScriptedGenerator::new(0));
    let rag = service(generator.clone()).await;

    let response = rag.answer("How do I detect a cycle in a linked list?").await?;

    assert_eq!(response.model, "scripted");
    assert_eq!(response.tokens_used, 42);
    assert!(!response.sources.is_empty());
    assert!(response.sources.iter().any(|s| s.id == "nc_141"));

    let prompt = generator.last_prompt.lock().unwrap().clone();
    assert!(prompt.contains("Linked List Cycle"));
    assert!(prompt.contains("How do I detect a cycle in a linked list?"));
    assert!(response.format().contains("Sources ("));
    Ok(())
}

#[tokio::test]
async fn test_answer_retries_transient_failures() -> Result<()> {
    let generator = Arc::new(ScriptedGenerator::new(2));
    let rag = service(generator.clone()).await;

    let response = rag
        .answer_with("two sum", PromptKind::AnswerProblem(PromptVersion::V1))
        .await?;

    assert_eq!(generator.calls(), 3);
    assert!(response.answer.starts_with("answer"));
    Ok(())
}

#[tokio::test]
async fn test_answer_gives_up_after_max_attempts() {
    let generator = Arc::new(ScriptedGenerator::new(10));
    let rag = service(generator.clone()).await;

    let err = rag.answer("two sum").await.unwrap_err();

    assert_eq!(generator.calls(), 3);
    assert!(matches!(err, SwaliError::Llm(_)));
}

#[tokio::test]
async fn test_hint_uses_short_generation() -> Result<()> {
    let generator = Arc::new(ScriptedGenerator::new(0));
    let rag = service(generator.clone()).await;

    let response = rag
        .hint("Linked List Cycle", HintLevel::Approach, "")
        .await?;

    assert_eq!(response.answer, "answer (300 max tokens)");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].id, "nc_141");
    assert!(generator.last_prompt.lock().unwrap().contains("No attempt yet"));
    Ok(())
}

#[tokio::test]
async fn test_hint_on_empty_collection() -> Result<()> {
    let config = AppConfig::default();
    let generator = Arc::new(ScriptedGenerator::new(0));
    let retriever = Retriever::new(
        Arc::new(BagOfWordsEmbedder::new("test-embed", 16)),
        Arc::new(InMemoryVectorStore::new("empty")),
        &config.retrieval,
    );
    let rag = RagService::from_services(retriever, generator.clone(), &config);

    let response = rag.hint("Two Sum", HintLevel::Nudge, "").await?;

    assert_eq!(response.answer, "I couldn't find a problem called 'Two Sum'.");
    assert_eq!(response.model, "none");
    assert!(response.sources.is_empty());
    assert_eq!(generator.calls(), 0);
    assert_eq!(rag.document_count().await?, 0);
    Ok(())
}
