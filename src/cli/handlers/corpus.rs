//! Ingestion and search handlers

use std::path::PathBuf;
use std::sync::Arc;

use super::open_collection;
use crate::cli::output::*;
use crate::embeddings::EmbeddingService;
use crate::ingest;
use crate::rag::Retriever;
use crate::vectorstore::VectorIndex;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ingest_command(config: &AppConfig, files: &[PathBuf], reset: bool) -> Result<()> {
    let documents = ingest::prepare_documents(files)?;
    print_info(&format!(
        "Prepared {} unique problems from {} file(s)",
        documents.len(),
        files.len()
    ));

    let store = open_collection(config)?;
    if reset {
        let removed = store.delete_all().await?;
        print_info(&format!("Removed {removed} existing documents"));
    }

    let embedder = EmbeddingService::new(config)?;
    let indexed = ingest::index_corpus(
        documents,
        &embedder,
        store.as_ref(),
        config.embeddings.batch_size,
    )
    .await?;
    store.persist().await?;

    print_success(&format!(
        "Indexed {indexed} documents into '{}' ({} total)",
        store.name(),
        store.count().await?
    ));
    Ok(())
}

pub async fn handle_search_command(
    config: &AppConfig,
    query: &str,
    limit: usize,
    no_rerank: bool,
) -> Result<()> {
    let embedder = Arc::new(EmbeddingService::new(config)?);
    let retriever = Retriever::new(embedder, open_collection(config)?, &config.retrieval);

    let rerank = config.retrieval.rerank && !no_rerank;
    let candidates = if rerank {
        retriever.search_reranked(query, limit).await?
    } else {
        retriever.search(query, limit).await?
    };

    print_search_results(query, &candidates, rerank);
    Ok(())
}
