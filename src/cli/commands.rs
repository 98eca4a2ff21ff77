//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

use crate::rag::PromptVersion;

#[derive(Parser)]
#[command(name = "swali")]
#[command(about = "Interview-prep RAG: ingest problems, ask questions, evaluate retrieval")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize, deduplicate and index problem files
    Ingest {
        /// JSON files holding arrays of problems
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Drop the existing collection first
        #[arg(long)]
        reset: bool,
    },
    /// Search the corpus without generating an answer
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
        /// Skip hybrid reranking
        #[arg(long)]
        no_rerank: bool,
    },
    /// Ask the coach a question
    Ask {
        question: String,
        /// Give a progressive hint (1-3) instead of a full answer
        #[arg(long, num_args = 0..=1, default_missing_value = "1")]
        hint: Option<u8>,
        /// What you have tried so far (hints only)
        #[arg(long)]
        attempt: Option<String>,
        /// Answer template version
        #[arg(long, value_enum, default_value = "v2")]
        prompt: PromptChoice,
    },
    /// Evaluate retrieval against labeled cases and log the run
    Evaluate {
        /// Cutoff for Recall@k and Precision@k
        #[arg(short, long, default_value = "5")]
        k: usize,
        /// Rerank candidates before scoring
        #[arg(long)]
        rerank: bool,
        /// Free-form notes stored with the run
        #[arg(long, default_value = "")]
        notes: String,
        /// JSON file of evaluation cases (default: built-in set)
        #[arg(long)]
        cases: Option<PathBuf>,
    },
    /// Run the reranker and embedding-model comparisons
    Experiments {
        #[arg(short, long, default_value = "5")]
        k: usize,
        /// Second embedding model (default: embeddings.comparison_model)
        #[arg(long)]
        model_b: Option<String>,
        #[arg(long)]
        cases: Option<PathBuf>,
    },
    /// Compare summaries of logged runs
    Compare {
        #[arg(required = true)]
        run_ids: Vec<String>,
    },
    /// List logged runs
    Runs,
    /// Show current configuration
    Config,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PromptChoice {
    V1,
    V2,
}

impl From<PromptChoice> for PromptVersion {
    fn from(choice: PromptChoice) -> Self {
        match choice {
            PromptChoice::V1 => Self::V1,
            PromptChoice::V2 => Self::V2,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_bare_hint() {
        let cli = Cli::parse_from(["swali", "ask", "two sum", "--hint"]);
        match cli.command {
            Commands::Ask { question, hint, .. } => {
                assert_eq!(question, "two sum");
                assert_eq!(hint, Some(1));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_compare() {
        let cli = Cli::parse_from(["swali", "--verbose", "compare", "a", "b"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Compare { ref run_ids } if run_ids.len() == 2));
    }
}
