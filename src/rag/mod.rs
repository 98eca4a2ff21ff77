//! RAG (Retrieval-Augmented Generation) module
//!
//! - Semantic retrieval over an injected vector index
//! - Hybrid reranking of nearest-neighbor candidates
//! - Context assembly and versioned prompts
//! - LLM answer and hint generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use swali::config::AppConfig;
//! use swali::rag::RagService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::new(&config)?;
//!
//!     let response = service.answer("How do I detect a cycle in a linked list?").await?;
//!     println!("Answer: {}", response.answer);
//!     println!("Sources: {} problems", response.sources.len());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod prompts;
pub mod reranker;
pub mod retriever;
pub mod scoring;

pub use context::ContextAssembler;
pub use context::Source;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use prompts::HintLevel;
pub use prompts::PromptKind;
pub use prompts::PromptVersion;
pub use reranker::HybridReranker;
pub use reranker::ScoredCandidate;
pub use retriever::Retriever;
