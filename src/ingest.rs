//! Corpus ingestion: normalize, deduplicate, enrich and index problems
//!
//! Raw problem records come from curated JSON files. Each record is turned
//! into an enriched searchable text (title, pattern, difficulty, tags and a
//! description excerpt) because embedding the title alone misses paraphrased
//! queries.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use sha2::Digest;
use sha2::Sha256;
use tracing::debug;
use tracing::info;

use crate::embeddings::Embedder;
use crate::errors::Result;
use crate::errors::SwaliError;
use crate::models::Document;
use crate::models::Metadata;
use crate::vectorstore::VectorIndex;

const SLUG_MAX_CHARS: usize = 60;
const DIGEST_HEX_CHARS: usize = 12;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// Interview problem as stored in the corpus files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Stable id such as `nc_1`; derived from the title when absent
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_source() -> String {
    "unknown_source".to_string()
}

fn default_kind() -> String {
    "coding_problem".to_string()
}

impl Problem {
    /// Explicit id, or `<source>_<title-slug>_<digest>`
    pub fn document_id(&self) -> String {
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            return id.to_string();
        }
        let title = normalize_text(&self.title);
        let title_slug: String = slugify(&title).chars().take(SLUG_MAX_CHARS).collect();
        let digest = hex::encode(Sha256::digest(title.as_bytes()));
        format!(
            "{}_{}_{}",
            slugify(&self.source),
            title_slug,
            &digest[..DIGEST_HEX_CHARS]
        )
    }

    /// Text that gets embedded
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![format!("Problem: {}", self.title)];
        if let Some(pattern) = &self.pattern {
            parts.push(format!("Pattern: {pattern}"));
        }
        parts.push(format!("Difficulty: {}", self.difficulty));
        if !self.tags.is_empty() {
            parts.push(format!("Tags: {}", self.tags.join(", ")));
        }
        if !self.description.is_empty() {
            let excerpt: String = self.description.chars().take(DESCRIPTION_MAX_CHARS).collect();
            parts.push(format!("Description: {excerpt}"));
        }
        parts.join("\n")
    }

    pub fn to_document(&self) -> Document {
        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), json!(self.title));
        metadata.insert("type".to_string(), json!(self.kind));
        metadata.insert("difficulty".to_string(), json!(self.difficulty));
        metadata.insert("source".to_string(), json!(self.source));
        if let Some(pattern) = &self.pattern {
            metadata.insert("pattern".to_string(), json!(pattern));
        }
        if let Some(url) = &self.source_url {
            metadata.insert("source_url".to_string(), json!(url));
        }
        Document::new(self.document_id(), self.searchable_text(), metadata)
    }

    /// Whitespace-normalized copy
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            title: normalize_text(&self.title),
            description: normalize_text(&self.description),
            difficulty: self.difficulty.trim().to_lowercase(),
            ..self.clone()
        }
    }
}

/// Collapse runs of whitespace into single spaces and trim
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase ASCII slug: alphanumeric runs joined by `-`
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Dedup key: lowercase title with punctuation treated as whitespace
pub fn canonical_key(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    normalize_text(&cleaned)
}

/// Keep the first problem per canonical title; drop empty titles
pub fn deduplicate(problems: Vec<Problem>) -> Vec<Problem> {
    let total = problems.len();
    let mut seen = HashSet::new();
    let deduped: Vec<Problem> = problems
        .into_iter()
        .filter(|problem| {
            let key = canonical_key(&problem.title);
            !key.is_empty() && seen.insert(key)
        })
        .collect();

    debug!("Deduplicated {} problems down to {}", total, deduped.len());
    deduped
}

/// Read a JSON array of problems
pub fn load_problems(path: impl AsRef<Path>) -> Result<Vec<Problem>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let problems: Vec<Problem> = serde_json::from_str(&content)?;
    info!("Loaded {} problems from {}", problems.len(), path.display());
    Ok(problems)
}

/// Load, normalize and deduplicate several files into documents
pub fn prepare_documents<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Document>> {
    let mut problems = Vec::new();
    for path in paths {
        problems.extend(load_problems(path)?.iter().map(Problem::normalized));
    }
    Ok(deduplicate(problems).iter().map(Problem::to_document).collect())
}

/// Embed documents in batches and store them; returns the number indexed
pub async fn index_corpus(
    documents: Vec<Document>,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    batch_size: usize,
) -> Result<usize> {
    if batch_size == 0 {
        return Err(SwaliError::InvalidInput(
            "batch size must be positive".to_string(),
        ));
    }

    let total = documents.len();
    let mut indexed = 0;
    let mut remaining = documents.into_iter().peekable();

    while remaining.peek().is_some() {
        let batch: Vec<Document> = remaining.by_ref().take(batch_size).collect();
        let texts: Vec<String> = batch.iter().map(|d| d.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        indexed += batch.len();
        index.add_with_embeddings(batch, embeddings).await?;
        debug!("Indexed {}/{} documents", indexed, total);
    }

    info!(
        "Indexed {} documents into '{}' with {}",
        indexed,
        index.name(),
        embedder.model_name()
    );
    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::vectorstore::InMemoryVectorStore;

    fn problem(title: &str) -> Problem {
        Problem {
            id: None,
            title: title.to_string(),
            difficulty: "easy".to_string(),
            pattern: Some("Arrays & Hashing".to_string()),
            description: String::new(),
            tags: vec!["array".to_string()],
            source: "NeetCode 150".to_string(),
            kind: "coding_problem".to_string(),
            source_url: None,
        }
    }

    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        fn model_name(&self) -> &str {
            "length"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Two \n\t Sum  "), "Two Sum");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Two Sum II - Input Array Is Sorted"), "two-sum-ii-input-array-is-sorted");
        assert_eq!(slugify("--NeetCode 150--"), "neetcode-150");
    }

    #[test]
    fn test_canonical_key_ignores_punctuation() {
        assert_eq!(canonical_key("Two-Sum!"), canonical_key("two sum"));
    }

    #[test]
    fn test_deduplicate_keeps_first() {
        let mut first = problem("Two Sum");
        first.id = Some("nc_1".to_string());
        let mut second = problem("two-sum");
        second.id = Some("lc_1".to_string());

        let deduped = deduplicate(vec![first, second, problem("  "), problem("Valid Anagram")]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id.as_deref(), Some("nc_1"));
        assert_eq!(deduped[1].title, "Valid Anagram");
    }

    #[test]
    fn test_generated_id_is_stable() {
        let id = problem("Two Sum").document_id();
        assert!(id.starts_with("neetcode-150_two-sum_"));
        assert_eq!(id.len(), "neetcode-150_two-sum_".len() + DIGEST_HEX_CHARS);
        assert_eq!(id, problem("Two   Sum").document_id());
    }

    #[test]
    fn test_to_document_enriches_text() {
        let mut p = problem("Two Sum");
        p.id = Some("nc_1".to_string());
        p.description = "Find two numbers that add up to target.".to_string();

        let doc = p.to_document();

        assert_eq!(doc.id, "nc_1");
        assert_eq!(doc.title(), "Two Sum");
        assert!(doc.text.contains("Pattern: Arrays & Hashing"));
        assert!(doc.text.contains("Tags: array"));
        assert!(doc.text.contains("Description: Find two numbers"));
        assert_eq!(doc.metadata["type"], json!("coding_problem"));
    }

    #[test]
    fn test_load_problems_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        std::fs::write(&path, r#"[{"id": "nc_217", "title": "Contains Duplicate"}]"#).unwrap();

        let problems = load_problems(&path).unwrap();

        assert_eq!(problems[0].difficulty, "medium");
        assert_eq!(problems[0].kind, "coding_problem");
        assert_eq!(prepare_documents(&[&path]).unwrap()[0].id, "nc_217");
    }

    #[tokio::test]
    async fn test_index_corpus_in_batches() {
        let store = InMemoryVectorStore::new("problems");
        let docs: Vec<Document> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|t| {
                let mut p = problem(t);
                p.id = Some(format!("id_{t}"));
                p.to_document()
            })
            .collect();

        let indexed = index_corpus(docs, &LengthEmbedder, &store, 2).await.unwrap();

        assert_eq!(indexed, 5);
        assert_eq!(store.count().await.unwrap(), 5);
    }
}
