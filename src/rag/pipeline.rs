//! Complete RAG pipeline: Retrieve -> Rerank -> Assemble -> Generate

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::llm::generate_with_retry;
use crate::llm::GenerationParams;
use crate::llm::LlmService;
use crate::llm::RetryPolicy;
use crate::llm::TextGenerator;
use crate::rag::context::Source;
use crate::rag::ContextAssembler;
use crate::rag::HintLevel;
use crate::rag::PromptKind;
use crate::rag::Retriever;
use crate::vectorstore::InMemoryVectorStore;
use crate::vectorstore::VectorIndex;

/// Hints stay short and focused
const HINT_MAX_TOKENS: usize = 300;
const HINT_TEMPERATURE: f32 = 0.5;

/// Answer plus the problems it was grounded on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    pub model: String,
    pub tokens_used: u32,
}

impl RagResponse {
    /// Human-readable rendering for the terminal
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = format!("{}\n\n", self.answer);
        output.push_str(&format!("Sources ({}):\n", self.sources.len()));
        for (idx, source) in self.sources.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} [{}] ({}, {})\n",
                idx + 1,
                source.title,
                source.id,
                source.kind,
                source.difficulty
            ));
        }
        output.push_str(&format!("Model: {} ({} tokens)\n", self.model, self.tokens_used));
        output
    }
}

pub struct RagService {
    retriever: Retriever,
    context_assembler: ContextAssembler,
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    params: GenerationParams,
    rerank: bool,
}

impl RagService {
    /// Build the HTTP-backed service and open the configured collection
    pub fn new(config: &AppConfig) -> Result<Self> {
        let embedder = Arc::new(EmbeddingService::new(config)?);
        let index = Arc::new(InMemoryVectorStore::open(
            config.storage.collection.clone(),
            config.collection_path(&config.storage.collection),
        )?);
        let generator = Arc::new(LlmService::new(config)?);
        Ok(Self::from_services(
            Retriever::new(embedder, index, &config.retrieval),
            generator,
            config,
        ))
    }

    /// Wire the pipeline from existing collaborators
    #[must_use]
    pub fn from_services(
        retriever: Retriever,
        generator: Arc<dyn TextGenerator>,
        config: &AppConfig,
    ) -> Self {
        Self {
            retriever,
            context_assembler: ContextAssembler::default(),
            generator,
            retry: RetryPolicy::from_config(&config.llm),
            params: GenerationParams::from_config(&config.llm),
            rerank: config.retrieval.rerank,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Answer with the default (latest) answer template
    pub async fn answer(&self, question: &str) -> Result<RagResponse> {
        self.answer_with(question, PromptKind::default()).await
    }

    pub async fn answer_with(&self, question: &str, prompt: PromptKind) -> Result<RagResponse> {
        info!("Processing question with {}: {}", prompt, question);

        debug!("Step 1: Retrieving problems");
        let top_k = self.retriever.top_k();
        let candidates = if self.rerank {
            self.retriever.search_reranked(question, top_k).await?
        } else {
            self.retriever.search(question, top_k).await?
        };
        debug!("Retrieved {} candidates", candidates.len());

        debug!("Step 2: Assembling context");
        let (context, sources) = self.context_assembler.assemble_with_metadata(&candidates);

        debug!("Step 3: Generating answer");
        let rendered = prompt.render(&context, question);
        let response =
            generate_with_retry(self.generator.as_ref(), &rendered, &self.params, &self.retry)
                .await?;

        info!("Answered with {} sources ({} tokens)", sources.len(), response.tokens_used);
        Ok(RagResponse {
            answer: response.content,
            sources,
            model: response.model,
            tokens_used: response.tokens_used,
        })
    }

    /// Progressive hint for the problem best matching `problem_title`
    pub async fn hint(
        &self,
        problem_title: &str,
        level: HintLevel,
        student_attempt: &str,
    ) -> Result<RagResponse> {
        let candidates = self.retriever.search(problem_title, 1).await?;
        let Some(problem) = candidates.first() else {
            return Ok(RagResponse {
                answer: format!("I couldn't find a problem called '{problem_title}'."),
                sources: Vec::new(),
                model: "none".to_string(),
                tokens_used: 0,
            });
        };

        info!("Hint level {} for {}", level.level(), problem.id);
        let rendered = PromptKind::Hint(level).render(&problem.text, student_attempt);
        let params = GenerationParams {
            temperature: HINT_TEMPERATURE,
            max_tokens: HINT_MAX_TOKENS,
            ..self.params.clone()
        };
        let response =
            generate_with_retry(self.generator.as_ref(), &rendered, &params, &self.retry).await?;

        Ok(RagResponse {
            answer: response.content,
            sources: vec![Source::from_candidate(problem)],
            model: response.model,
            tokens_used: response.tokens_used,
        })
    }

    #[must_use]
    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Number of indexed documents
    pub async fn document_count(&self) -> Result<usize> {
        self.retriever.index().count().await
    }

    #[must_use]
    pub const fn context_assembler(&self) -> &ContextAssembler {
        &self.context_assembler
    }
}
