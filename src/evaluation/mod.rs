//! Retrieval evaluation: metrics, batch runner and experiment tracking
//!
//! - [`metrics`]: Recall@k, Precision@k and reciprocal rank for one query
//! - [`runner`]: drives labeled cases through a retrieval strategy
//! - [`tracker`]: persists runs as JSON and compares them across time
//! - [`fixtures`]: curated evaluation cases
//!
//! # Examples
//!
//! ```rust
//! use swali::evaluation::EvaluationCase;
//! use swali::evaluation::EvaluationRunner;
//!
//! let cases = vec![EvaluationCase::new("two sum in linear time", ["nc_1"])];
//! let run = EvaluationRunner::new()
//!     .evaluate(&cases, |_query| Ok(vec!["nc_1".to_string(), "nc_15".to_string()]), 5)
//!     .unwrap();
//!
//! let summary = run.summary().unwrap();
//! assert_eq!(summary.num_cases, 1);
//! assert!((summary.avg_mrr - 1.0).abs() < f64::EPSILON);
//! ```

pub mod fixtures;
pub mod metrics;
pub mod runner;
pub mod tracker;

use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

pub use runner::EvaluationRunner;
pub use tracker::ComparedRun;
pub use tracker::ExperimentTracker;
pub use tracker::RunComparison;
pub use tracker::StoredRun;

/// Experiment configuration attached to a run
pub type RunConfig = serde_json::Map<String, serde_json::Value>;

/// A labeled query used as ground truth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCase {
    pub query: String,
    /// Relevant document ids; order carries no meaning
    #[serde(alias = "expected_doc_ids")]
    pub expected_ids: BTreeSet<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// Key points a generated answer should mention
    #[serde(default)]
    pub expected_answer_contains: Vec<String>,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

impl EvaluationCase {
    pub fn new<I, S>(query: impl Into<String>, expected_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.into(),
            expected_ids: expected_ids.into_iter().map(Into::into).collect(),
            category: default_category(),
            difficulty: default_difficulty(),
            expected_answer_contains: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    #[must_use]
    pub fn with_answer_points<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_answer_contains = points.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of one case within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub query: String,
    /// First `k` ids returned by the strategy
    pub retrieved_ids: Vec<String>,
    pub expected_ids: BTreeSet<String>,
    pub recall_at_k: f64,
    pub precision_at_k: f64,
    pub mrr: f64,
    pub k: usize,
}

/// Aggregate metrics of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub num_cases: usize,
    pub avg_recall: f64,
    pub avg_precision: f64,
    pub avg_mrr: f64,
}

/// One complete pass of a retrieval strategy over a labeled case set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRun {
    pub run_id: String,
    pub timestamp: DateTime<Utc>,
    pub config: RunConfig,
    pub results: Vec<RetrievalResult>,
}

impl EvaluationRun {
    pub fn new(run_id: impl Into<String>, timestamp: DateTime<Utc>, config: RunConfig) -> Self {
        Self {
            run_id: run_id.into(),
            timestamp,
            config,
            results: Vec::new(),
        }
    }

    /// Mean metrics across results; `None` when the run has no cases
    pub fn summary(&self) -> Option<RunSummary> {
        if self.results.is_empty() {
            return None;
        }
        let n = self.results.len() as f64;
        let mean = |metric: fn(&RetrievalResult) -> f64| {
            self.results.iter().map(metric).sum::<f64>() / n
        };

        Some(RunSummary {
            run_id: self.run_id.clone(),
            num_cases: self.results.len(),
            avg_recall: mean(|r| r.recall_at_k),
            avg_precision: mean(|r| r.precision_at_k),
            avg_mrr: mean(|r| r.mrr),
        })
    }

    /// Append a suffix such as `_embedA` to tell related runs apart
    #[must_use]
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.run_id.push_str(suffix);
        self
    }

    #[must_use]
    pub fn with_config(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}
