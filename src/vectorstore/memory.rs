//! Brute-force cosine index with an optional JSON snapshot on disk

use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

use super::VectorIndex;
use crate::errors::Result;
use crate::errors::SwaliError;
use crate::models::Document;
use crate::models::QueryResponse;
use crate::rag::scoring::cosine_distance;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    document: Document,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    name: String,
    entries: Vec<StoredEntry>,
}

pub struct InMemoryVectorStore {
    name: String,
    path: Option<PathBuf>,
    entries: RwLock<Vec<StoredEntry>>,
}

impl InMemoryVectorStore {
    /// Empty, memory-only collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Collection backed by a snapshot file, loaded if it already exists
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            info!(
                "Loaded collection '{}' with {} documents from {}",
                name,
                snapshot.entries.len(),
                path.display()
            );
            snapshot.entries
        } else {
            debug!("Collection '{}' starts empty ({})", name, path.display());
            Vec::new()
        };

        Ok(Self {
            name,
            path: Some(path),
            entries: RwLock::new(entries),
        })
    }

    /// Write the snapshot file; no-op for memory-only collections
    pub async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries = self.entries.read().await;
        let snapshot = Snapshot {
            name: self.name.clone(),
            entries: entries.clone(),
        };
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(&snapshot)?)?;
        std::fs::rename(&tmp, path)?;

        info!(
            "Persisted collection '{}' ({} documents) to {}",
            self.name,
            entries.len(),
            path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<QueryResponse> {
        let entries = self.entries.read().await;
        if let Some(first) = entries.first() {
            if first.embedding.len() != embedding.len() {
                return Err(SwaliError::InvalidInput(format!(
                    "query embedding has {} dimensions, collection '{}' uses {}",
                    embedding.len(),
                    self.name,
                    first.embedding.len()
                )));
            }
        }

        let mut scored: Vec<(f64, &StoredEntry)> = entries
            .iter()
            .map(|entry| (cosine_distance(embedding, &entry.embedding), entry))
            .collect();
        // Stable: equal distances keep insertion order, NaN distances go last
        scored.sort_by(|a, b| {
            a.0.is_nan()
                .cmp(&b.0.is_nan())
                .then_with(|| a.0.total_cmp(&b.0))
        });
        scored.truncate(n_results);

        let mut response = QueryResponse::default();
        for (distance, entry) in scored {
            response.ids.push(entry.document.id.clone());
            response.documents.push(entry.document.text.clone());
            response.metadatas.push(entry.document.metadata.clone());
            response.distances.push(distance);
        }
        Ok(response)
    }

    async fn get_all(&self) -> Result<Vec<Document>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().map(|e| e.document.clone()).collect())
    }

    async fn add_with_embeddings(
        &self,
        documents: Vec<Document>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<()> {
        if documents.len() != embeddings.len() {
            return Err(SwaliError::MisalignedResults {
                field: "embeddings",
                expected: documents.len(),
                actual: embeddings.len(),
            });
        }

        let mut entries = self.entries.write().await;
        let dimension = entries
            .first()
            .map(|e| e.embedding.len())
            .or_else(|| embeddings.first().map(Vec::len));
        // Validate the whole batch before mutating anything
        if let Some((document, embedding)) = documents
            .iter()
            .zip(&embeddings)
            .find(|(_, embedding)| Some(embedding.len()) != dimension)
        {
            return Err(SwaliError::InvalidInput(format!(
                "embedding for '{}' has {} dimensions, collection '{}' uses {}",
                document.id,
                embedding.len(),
                self.name,
                dimension.unwrap_or_default()
            )));
        }

        for (document, embedding) in documents.into_iter().zip(embeddings) {
            match entries.iter_mut().find(|e| e.document.id == document.id) {
                Some(existing) => {
                    existing.document = document;
                    existing.embedding = embedding;
                }
                None => entries.push(StoredEntry {
                    document,
                    embedding,
                }),
            }
        }

        debug!("Collection '{}' now holds {} documents", self.name, entries.len());
        Ok(())
    }

    async fn delete_all(&self) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        if removed > 0 {
            info!("Deleted {} documents from '{}'", removed, self.name);
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}
