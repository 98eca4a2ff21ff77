//! Similarity signals used by the hybrid reranker
//!
//! Both signals follow the "higher is better" convention:
//! - semantic score is the negated vector distance
//! - lexical score is the fraction of query tokens present in the candidate

use std::collections::HashSet;

/// Lower-case, split into maximal ASCII alphanumeric runs, drop 1-char tokens
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() > 1)
        .map(str::to_string)
        .collect()
}

/// `|query ∩ doc| / |query|`, or 0.0 when either side has no tokens
pub fn lexical_overlap(query: &str, doc_text: &str) -> f64 {
    overlap_with_tokens(&tokenize(query), doc_text)
}

/// Same as [`lexical_overlap`] with the query already tokenized
pub fn overlap_with_tokens(query_tokens: &HashSet<String>, doc_text: &str) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let doc_tokens = tokenize(doc_text);
    if doc_tokens.is_empty() {
        return 0.0;
    }
    let hits = query_tokens.intersection(&doc_tokens).count();
    hits as f64 / query_tokens.len() as f64
}

/// Distance (0 = identical) flipped so larger means closer
pub fn semantic_score(distance: f64) -> f64 {
    -distance
}

/// Cosine distance `1 - cos(a, b)`; 1.0 if either vector has zero norm
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_punctuation_and_single_chars() {
        let tokens = tokenize("Two-Sum: a O(n) hash_map!");
        let mut sorted: Vec<_> = tokens.into_iter().collect();
        sorted.sort();
        assert_eq!(sorted, vec!["hash", "map", "sum", "two"]);
    }

    #[test]
    fn test_tokenize_deduplicates() {
        assert_eq!(tokenize("array Array ARRAY").len(), 1);
    }

    #[test]
    fn test_lexical_overlap_fraction_of_query_tokens() {
        let score = lexical_overlap("two sum hash map", "Pair search array pair problem");
        assert!(score.abs() < f64::EPSILON);

        let score = lexical_overlap("two sum hash map", "Two Sum two sum using hash map");
        assert!((score - 1.0).abs() < f64::EPSILON);

        let score = lexical_overlap("linked list cycle detection", "cycle in a list");
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lexical_overlap_empty_sides() {
        assert!(lexical_overlap("", "anything here").abs() < f64::EPSILON);
        assert!(lexical_overlap("a ? !", "anything here").abs() < f64::EPSILON);
        assert!(lexical_overlap("two sum", "").abs() < f64::EPSILON);
    }

    #[test]
    fn test_semantic_score_negates() {
        assert!(semantic_score(0.2) > semantic_score(0.3));
        assert!(semantic_score(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cosine_distance() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-9);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-9);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-9);
        assert!((cosine_distance(&[0.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
    }
}
