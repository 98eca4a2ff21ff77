//! Curated evaluation cases

use std::path::Path;

use super::EvaluationCase;
use crate::errors::Result;
use crate::errors::SwaliError;

/// Small deterministic set against known corpus ids
pub fn sample_cases() -> Vec<EvaluationCase> {
    vec![
        EvaluationCase::new("How do I solve two sum in linear time?", ["nc_1"])
            .with_category("arrays_hashing")
            .with_difficulty("easy")
            .with_answer_points(["hash map", "O(n)", "complement"]),
        EvaluationCase::new("How can I detect a cycle in a linked list?", ["nc_141"])
            .with_category("linked_list")
            .with_difficulty("easy")
            .with_answer_points(["two pointers", "fast", "slow", "Floyd"]),
        EvaluationCase::new(
            "Design a tinyurl style URL shortening system",
            ["sd_url_shortener"],
        )
        .with_category("system_design")
        .with_difficulty("medium")
        .with_answer_points(["base62", "hash", "database", "cache"]),
        EvaluationCase::new("How do I check if an array has duplicates quickly?", ["nc_217"])
            .with_category("arrays_hashing")
            .with_difficulty("easy"),
    ]
}

/// Load cases from a JSON array file; every case needs at least one expected id
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<EvaluationCase>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let cases: Vec<EvaluationCase> = serde_json::from_str(&content)?;
    if let Some(case) = cases.iter().find(|c| c.expected_ids.is_empty()) {
        return Err(SwaliError::InvalidInput(format!(
            "case '{}' in {} has no expected ids",
            case.query,
            path.display()
        )));
    }
    Ok(cases)
}
