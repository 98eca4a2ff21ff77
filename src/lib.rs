//! Swali: retrieval-augmented interview preparation
//!
//! Retrieval core (hybrid reranking, evaluation metrics, run tracking) plus
//! the plumbing around it: embedding and chat clients, an in-memory vector
//! index, corpus ingestion and the experiment harness.

pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod evaluation;
pub mod experiments;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod vectorstore;

#[cfg(test)]
mod config_tests;

pub use config::AppConfig;
pub use errors::*;
