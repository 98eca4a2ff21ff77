//! CLI output formatting utilities

use crate::evaluation::RunComparison;
use crate::evaluation::RunSummary;
use crate::experiments::ExperimentReport;
use crate::models::Candidate;
use crate::AppConfig;

/// Truncate at a character boundary, appending "..." when shortened
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

pub fn print_search_results(query: &str, candidates: &[Candidate], reranked: bool) {
    let mode = if reranked { "reranked" } else { "vector" };
    println!("🔍 {} results for \"{}\" ({mode}):", candidates.len(), query);
    for (idx, candidate) in candidates.iter().enumerate() {
        println!(
            "  {}. {} [{}] distance={:.3}",
            idx + 1,
            candidate.title,
            candidate.id,
            candidate.distance
        );
        println!("     {}", truncate_str(&candidate.text, 100));
    }
}

fn format_summary(summary: Option<&RunSummary>) -> String {
    match summary {
        Some(s) => format!(
            "recall={:.3} precision={:.3} mrr={:.3} (n={})",
            s.avg_recall, s.avg_precision, s.avg_mrr, s.num_cases
        ),
        None => "no cases".to_string(),
    }
}

pub fn print_run_summary(run_id: &str, summary: Option<&RunSummary>) {
    println!("📊 {run_id}: {}", format_summary(summary));
}

pub fn print_comparison(comparison: &RunComparison) {
    if comparison.runs.is_empty() {
        print_warning("None of the requested runs are logged");
        return;
    }
    println!("{:<32} {:<44} notes", "run", "summary");
    for run in &comparison.runs {
        println!(
            "{:<32} {:<44} {}",
            run.run_id,
            format_summary(run.summary.as_ref()),
            run.notes
        );
    }
}

pub fn print_experiment_report(report: &ExperimentReport) {
    println!("=== Retrieval Experiment Summary ===");
    for entry in &report.entries {
        println!("{} -> {}", entry.experiment, entry.path.display());
        print_run_summary(&entry.run_id, entry.summary.as_ref());
    }
}

pub fn print_config(config: &AppConfig) {
    println!("📋 Swali Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Directory: {}", config.logging.directory.display());
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embedding_model());
    println!("  Comparison model: {}", config.embeddings.comparison_model);
    println!("  Key: {}", mask_key(config.embeddings.api_key.as_deref()));
    println!();

    println!("🔎 Retrieval:");
    println!("  Top k: {}", config.retrieval.top_k);
    println!("  Candidate pool: {}", config.retrieval.candidate_pool);
    println!(
        "  Weights: semantic={} lexical={}",
        config.retrieval.semantic_weight, config.retrieval.lexical_weight
    );
    println!("  Rerank: {}", config.retrieval.rerank);
    println!();

    println!("🗄️  Storage:");
    println!("  Index dir: {}", config.storage.index_dir.display());
    println!("  Experiments dir: {}", config.storage.experiments_dir.display());
    println!("  Collection: {}", config.storage.collection);
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Model: {}", config.llm_model());
    println!("  Key: {}", mask_key(config.llm.api_key.as_deref()));
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        Some(k) if k.chars().count() > 8 => {
            let prefix: String = k.chars().take(4).collect();
            format!("{prefix}****")
        }
        Some(_) => "****".to_string(),
        None => "(not set)".to_string(),
    }
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_str("short", 10), "short");
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(None), "(not set)");
        assert_eq!(mask_key(Some("abc")), "****");
        assert_eq!(mask_key(Some("sk-1234567890")), "sk-1****");
    }

    #[test]
    fn test_format_summary_empty_run() {
        assert_eq!(format_summary(None), "no cases");
    }
}
