//! Logging configuration for Swali

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{
    self,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::AppConfig;
use crate::Result;

const LOG_FILE_PREFIX: &str = "swali.log";

/// Initialize logging from the application configuration
pub fn init_logging_with_config(config: &AppConfig) -> Result<()> {
    init_logging(&config.logging.level, &config.logging.directory)
}

/// Initialize logging with a custom level, writing files to `logs/`
pub fn init_logging_with_level(level: &str) -> Result<()> {
    init_logging(level, Path::new("logs"))
}

/// Console (stderr) plus daily rolling file output
pub fn init_logging(level: &str, directory: &Path) -> Result<()> {
    if !directory.exists() {
        std::fs::create_dir_all(directory)?;
    }

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},swali={level}")));

    let file_appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::SwaliError::ConfigError(format!("logging already initialized: {e}")))?;

    tracing::info!("Logging initialized with level: {}", level);
    tracing::info!(
        "Log files will be saved to: {}/{}.YYYY-MM-DD",
        directory.display(),
        LOG_FILE_PREFIX
    );

    // The writer thread must outlive main
    std::mem::forget(guard);

    Ok(())
}

/// Initialize simple logging for testing
pub fn init_simple_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
