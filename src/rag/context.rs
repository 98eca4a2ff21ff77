//! Context assembly from retrieved problems

use serde::Deserialize;
use serde::Serialize;

use crate::cli::output::truncate_str;
use crate::models::Candidate;

/// Content characters kept per document
pub const MAX_CONTENT_CHARS: usize = 500;

const SEPARATOR: &str = "\n\n---\n\n";

/// A retrieved document cited in an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub pattern: Option<String>,
}

impl Source {
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            title: display_title(candidate),
            kind: candidate.meta("type").unwrap_or_else(|| "problem".to_string()),
            difficulty: candidate.meta("difficulty").unwrap_or_else(|| "N/A".to_string()),
            pattern: candidate
                .meta("pattern_name")
                .or_else(|| candidate.meta("pattern")),
        }
    }
}

fn display_title(candidate: &Candidate) -> String {
    if candidate.title.is_empty() {
        "Unknown".to_string()
    } else {
        candidate.title.clone()
    }
}

/// Formats candidates into numbered prompt context
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// Assemble context; stops before the first block that would overflow
    #[must_use]
    pub fn assemble(&self, candidates: &[Candidate]) -> String {
        self.assemble_with_metadata(candidates).0
    }

    /// Assemble context along with the sources that made it in
    #[must_use]
    pub fn assemble_with_metadata(&self, candidates: &[Candidate]) -> (String, Vec<Source>) {
        let mut context = String::new();
        let mut sources = Vec::new();

        for (idx, candidate) in candidates.iter().enumerate() {
            let block = self.format_candidate(idx + 1, candidate);
            let separator = if context.is_empty() { "" } else { SEPARATOR };

            if context.len() + separator.len() + block.len() > self.max_context_length {
                break;
            }

            context.push_str(separator);
            context.push_str(&block);
            sources.push(Source::from_candidate(candidate));
        }

        (context, sources)
    }

    fn format_candidate(&self, position: usize, candidate: &Candidate) -> String {
        let content: String = candidate.text.chars().take(MAX_CONTENT_CHARS).collect();
        format!(
            "[{}] {}\nType: {}\nDifficulty: {}\nContent: {}",
            position,
            display_title(candidate),
            candidate.meta("type").unwrap_or_else(|| "problem".to_string()),
            candidate.meta("difficulty").unwrap_or_else(|| "N/A".to_string()),
            content
        )
    }

    /// One line per candidate for terminal output
    #[must_use]
    pub fn create_summary(&self, candidates: &[Candidate]) -> String {
        if candidates.is_empty() {
            return "No problems found.".to_string();
        }

        let mut summary = format!("Found {} relevant problem(s):\n\n", candidates.len());
        for (idx, candidate) in candidates.iter().enumerate() {
            summary.push_str(&format!(
                "{}. {} [{}] - distance {:.3}\n   {}\n\n",
                idx + 1,
                display_title(candidate),
                candidate.id,
                candidate.distance,
                truncate_str(&candidate.text, 100)
            ));
        }
        summary
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(8000)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Metadata;

    fn candidate(id: &str, title: &str, text: &str) -> Candidate {
        let mut metadata = Metadata::new();
        metadata.insert("title".to_string(), json!(title));
        metadata.insert("type".to_string(), json!("leetcode"));
        metadata.insert("difficulty".to_string(), json!("Easy"));
        metadata.insert("pattern".to_string(), json!("Arrays & Hashing"));
        Candidate {
            id: id.to_string(),
            text: text.to_string(),
            title: title.to_string(),
            distance: 0.1,
            metadata,
        }
    }

    #[test]
    fn test_block_format_and_separator() {
        let (context, sources) = ContextAssembler::default().assemble_with_metadata(&[
            candidate("nc_1", "Two Sum", "Find two numbers"),
            candidate("nc_217", "Contains Duplicate", "Use a set"),
        ]);

        assert_eq!(
            context,
            "[1] Two Sum\nType: leetcode\nDifficulty: Easy\nContent: Find two numbers\
             \n\n---\n\n[2] Contains Duplicate\nType: leetcode\nDifficulty: Easy\nContent: Use a set"
        );
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].pattern.as_deref(), Some("Arrays & Hashing"));
    }

    #[test]
    fn test_content_truncated_on_char_boundary() {
        let text = "é".repeat(MAX_CONTENT_CHARS + 20);
        let context = ContextAssembler::default().assemble(&[candidate("x", "X", &text)]);
        let content = context.split("Content: ").nth(1).unwrap();
        assert_eq!(content.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn test_stops_at_max_length() {
        let assembler = ContextAssembler::new(120);
        let (context, sources) = assembler.assemble_with_metadata(&[
            candidate("a", "A", "first"),
            candidate("b", "B", &"long ".repeat(50)),
        ]);

        assert_eq!(sources.len(), 1);
        assert!(context.len() <= 120);
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let bare = Candidate {
            id: "q".to_string(),
            text: "text".to_string(),
            title: String::new(),
            distance: 0.0,
            metadata: Metadata::new(),
        };
        let source = Source::from_candidate(&bare);
        assert_eq!(source.title, "Unknown");
        assert_eq!(source.kind, "problem");
        assert_eq!(source.difficulty, "N/A");
        assert!(source.pattern.is_none());
    }
}
