//! CLI command handlers, organized by domain:
//! - corpus: ingestion and search
//! - ask: answers and hints
//! - evaluation: evaluation runs, experiments and comparisons
//! - info: configuration display

pub mod ask;
pub mod corpus;
pub mod evaluation;
pub mod info;

use std::sync::Arc;

pub use ask::*;
pub use corpus::*;
pub use evaluation::*;
pub use info::*;

use crate::vectorstore::InMemoryVectorStore;
use crate::AppConfig;
use crate::Result;

/// Open the configured collection from its snapshot file
pub(crate) fn open_collection(config: &AppConfig) -> Result<Arc<InMemoryVectorStore>> {
    let collection = &config.storage.collection;
    Ok(Arc::new(InMemoryVectorStore::open(
        collection.clone(),
        config.collection_path(collection),
    )?))
}
