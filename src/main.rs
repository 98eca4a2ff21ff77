use anyhow::Context;
use clap::Parser;
use swali::cli::handlers::*;
use swali::cli::Cli;
use swali::cli::Commands;
use swali::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    swali::logging::init_logging(level, &config.logging.directory)?;
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Ingest { files, reset } => {
            handle_ingest_command(&config, &files, reset).await?;
        }
        Commands::Search {
            query,
            limit,
            no_rerank,
        } => {
            handle_search_command(&config, &query, limit, no_rerank).await?;
        }
        Commands::Ask {
            question,
            hint,
            attempt,
            prompt,
        } => {
            handle_ask_command(&config, &question, hint, attempt.as_deref(), prompt.into())
                .await?;
        }
        Commands::Evaluate {
            k,
            rerank,
            notes,
            cases,
        } => {
            handle_evaluate_command(&config, k, rerank, &notes, cases.as_deref())
                .await
                .context("evaluation aborted")?;
        }
        Commands::Experiments { k, model_b, cases } => {
            handle_experiments_command(&config, k, model_b.as_deref(), cases.as_deref())
                .await
                .context("experiments aborted")?;
        }
        Commands::Compare { run_ids } => {
            handle_compare_command(&config, &run_ids)?;
        }
        Commands::Runs => {
            handle_runs_command(&config)?;
        }
        Commands::Config => {
            handle_config_command(&config)?;
        }
    }

    Ok(())
}
