//! Shared record types crossing the vector index boundary

use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;
use crate::errors::SwaliError;

/// Free-form metadata attached to an indexed document
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A document stored in (or read back from) a vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata,
        }
    }

    /// `metadata["title"]` as a string, empty when absent
    pub fn title(&self) -> String {
        metadata_str(&self.metadata, "title")
    }
}

/// One item returned by nearest-neighbor search for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub text: String,
    pub title: String,
    /// Lower is more similar; 0 means identical
    pub distance: f64,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Candidate {
    /// Look up a metadata field rendered as a string
    pub fn meta(&self, key: &str) -> Option<String> {
        self.metadata.get(key).and_then(value_to_string)
    }
}

/// Raw per-query response in the vector index's parallel-array shape.
///
/// The i-th id corresponds to the i-th document, metadata and distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<Metadata>,
    pub distances: Vec<f64>,
}

impl QueryResponse {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check that all four sequences share the same length
    pub fn validate(&self) -> Result<()> {
        let expected = self.ids.len();
        for (field, actual) in [
            ("documents", self.documents.len()),
            ("metadatas", self.metadatas.len()),
            ("distances", self.distances.len()),
        ] {
            if actual != expected {
                return Err(SwaliError::MisalignedResults {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Convert to candidate records, failing fast on misalignment
    pub fn into_candidates(self) -> Result<Vec<Candidate>> {
        self.validate()?;
        let candidates = self
            .ids
            .into_iter()
            .zip(self.documents)
            .zip(self.metadatas)
            .zip(self.distances)
            .map(|(((id, text), metadata), distance)| Candidate {
                id,
                text,
                title: metadata_str(&metadata, "title"),
                distance,
                metadata,
            })
            .collect();
        Ok(candidates)
    }

    /// Re-emit candidates in the boundary shape, preserving order
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        let mut response = Self {
            ids: Vec::with_capacity(candidates.len()),
            documents: Vec::with_capacity(candidates.len()),
            metadatas: Vec::with_capacity(candidates.len()),
            distances: Vec::with_capacity(candidates.len()),
        };
        for candidate in candidates {
            response.ids.push(candidate.id);
            response.documents.push(candidate.text);
            response.metadatas.push(candidate.metadata);
            response.distances.push(candidate.distance);
        }
        response
    }
}

fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn metadata_str(metadata: &Metadata, key: &str) -> String {
    metadata
        .get(key)
        .and_then(value_to_string)
        .unwrap_or_default()
}
