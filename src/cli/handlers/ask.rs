//! Answer and hint handlers

use crate::cli::output::*;
use crate::rag::HintLevel;
use crate::rag::PromptKind;
use crate::rag::PromptVersion;
use crate::rag::RagService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ask_command(
    config: &AppConfig,
    question: &str,
    hint: Option<u8>,
    attempt: Option<&str>,
    version: PromptVersion,
) -> Result<()> {
    let service = RagService::new(config)?;
    if service.document_count().await? == 0 {
        print_warning("The collection is empty; run `swali ingest` first");
    }

    let response = match hint {
        Some(level) => {
            let level = HintLevel::from_level(level);
            print_info(&format!("Hint level {}", level.level()));
            service
                .hint(question, level, attempt.unwrap_or_default())
                .await?
        }
        None => {
            service
                .answer_with(question, PromptKind::AnswerProblem(version))
                .await?
        }
    };

    println!("{}", response.format());
    Ok(())
}
