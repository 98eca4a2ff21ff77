//! In-process collaborators shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use swali::embeddings::Embedder;
use swali::evaluation::EvaluationCase;
use swali::llm::GenerationParams;
use swali::llm::LlmResponse;
use swali::llm::TextGenerator;
use swali::models::Document;
use swali::models::Metadata;
use swali::models::QueryResponse;
use swali::vectorstore::InMemoryVectorStore;
use swali::vectorstore::VectorIndex;
use swali::Result;
use swali::SwaliError;

/// Hashes tokens into `dimension` buckets; counts every call
pub struct BagOfWordsEmbedder {
    name: String,
    dimension: usize,
    pub calls: AtomicUsize,
}

impl BagOfWordsEmbedder {
    pub fn new(name: &str, dimension: usize) -> Self {
        Self {
            name: name.to_string(),
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for BagOfWordsEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0_f32; self.dimension];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| t.len() > 1)
        {
            let bucket = token.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            vector[bucket % self.dimension] += 1.0;
        }
        Ok(vector)
    }
}

pub fn problem(id: &str, title: &str, text: &str) -> Document {
    let mut metadata = Metadata::new();
    metadata.insert("title".to_string(), json!(title));
    metadata.insert("type".to_string(), json!("coding_problem"));
    metadata.insert("difficulty".to_string(), json!("easy"));
    Document::new(id, text, metadata)
}

pub fn corpus() -> Vec<Document> {
    vec![
        problem("nc_1", "Two Sum", "Two Sum: find two numbers in an array that add up to a target using a hash map"),
        problem("nc_141", "Linked List Cycle", "Detect a cycle in a linked list with fast and slow pointers"),
        problem("nc_217", "Contains Duplicate", "Check whether an array contains any duplicate value using a set"),
        problem("nc_104", "Maximum Depth of Binary Tree", "Depth of a binary tree with recursive DFS"),
        problem("sd_url_shortener", "URL Shortener", "Design a URL shortening service with base62 ids, a database and a cache"),
    ]
}

pub fn cases() -> Vec<EvaluationCase> {
    vec![
        EvaluationCase::new("two sum hash map target", ["nc_1"]),
        EvaluationCase::new("cycle in linked list", ["nc_141"]),
        EvaluationCase::new("design url shortening service", ["sd_url_shortener"]),
    ]
}

/// Corpus indexed with `embedder` in a fresh in-memory collection
pub async fn indexed_store(name: &str, embedder: &dyn Embedder) -> Arc<InMemoryVectorStore> {
    let store = Arc::new(InMemoryVectorStore::new(name));
    swali::ingest::index_corpus(corpus(), embedder, store.as_ref(), 2)
        .await
        .unwrap();
    store
}

/// Index whose queries always fail
pub struct OfflineIndex;

#[async_trait]
impl VectorIndex for OfflineIndex {
    fn name(&self) -> &str {
        "offline"
    }

    async fn query(&self, _embedding: &[f32], _n_results: usize) -> Result<QueryResponse> {
        Err(SwaliError::Retrieval("index offline".to_string()))
    }

    async fn get_all(&self) -> Result<Vec<Document>> {
        Ok(corpus())
    }

    async fn add_with_embeddings(&self, _documents: Vec<Document>, _embeddings: Vec<Vec<f32>>) -> Result<()> {
        Err(SwaliError::Retrieval("index offline".to_string()))
    }

    async fn delete_all(&self) -> Result<usize> {
        Ok(0)
    }

    async fn count(&self) -> Result<usize> {
        Ok(0)
    }
}

/// Echoes the prompt back; fails the first `failures` calls
pub struct ScriptedGenerator {
    failures: usize,
    pub calls: AtomicUsize,
    pub last_prompt: std::sync::Mutex<String>,
}

impl ScriptedGenerator {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
            last_prompt: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<LlmResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_prompt.lock().unwrap() = prompt.to_string();
        if call <= self.failures {
            return Err(SwaliError::HttpError("503 Service Unavailable".to_string()));
        }
        Ok(LlmResponse {
            content: format!("answer ({} max tokens)", params.max_tokens),
            model: "scripted".to_string(),
            tokens_used: 42,
            finish_reason: "stop".to_string(),
        })
    }
}
