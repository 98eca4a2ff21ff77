//! Ranking-quality metrics for a single query
//!
//! All functions are pure and order-sensitive in `retrieved`; `expected` is a
//! set, so only membership matters. Duplicate ids in `retrieved` count once.

use std::collections::BTreeSet;
use std::collections::HashSet;

use crate::errors::Result;
use crate::errors::SwaliError;

fn hits_in_top_k<S: AsRef<str>>(retrieved: &[S], expected: &BTreeSet<String>, k: usize) -> usize {
    retrieved
        .iter()
        .take(k)
        .map(|id| id.as_ref())
        .filter(|id| expected.contains(*id))
        .collect::<HashSet<&str>>()
        .len()
}

/// `|top_k(retrieved) ∩ expected| / |expected|`.
///
/// A query with no known-relevant document cannot be missed, so an empty
/// `expected` yields 1.0. Inputs shorter than `k` are scored as-is.
pub fn recall_at_k<S: AsRef<str>>(retrieved: &[S], expected: &BTreeSet<String>, k: usize) -> f64 {
    if expected.is_empty() {
        return 1.0;
    }
    hits_in_top_k(retrieved, expected, k) as f64 / expected.len() as f64
}

/// `|top_k(retrieved) ∩ expected| / k`.
///
/// Always divides by `k`, even when fewer than `k` ids were retrieved: callers
/// choose a `k` the backend can satisfy. `k == 0` and an empty `expected`
/// are rejected.
pub fn precision_at_k<S: AsRef<str>>(
    retrieved: &[S],
    expected: &BTreeSet<String>,
    k: usize,
) -> Result<f64> {
    if k == 0 {
        return Err(SwaliError::InvalidInput(
            "precision@k requires k > 0".to_string(),
        ));
    }
    if expected.is_empty() {
        return Err(SwaliError::InvalidInput(
            "precision@k requires at least one expected id".to_string(),
        ));
    }
    Ok(hits_in_top_k(retrieved, expected, k) as f64 / k as f64)
}

/// Reciprocal rank of the first relevant id (1-based), 0.0 if none appears.
pub fn mrr<S: AsRef<str>>(retrieved: &[S], expected: &BTreeSet<String>) -> f64 {
    retrieved
        .iter()
        .position(|id| expected.contains(id.as_ref()))
        .map_or(0.0, |idx| 1.0 / (idx + 1) as f64)
}
