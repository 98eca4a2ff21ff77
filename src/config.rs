use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;
use crate::errors::SwaliError;

/// Environment variable that overrides `llm.api_key`
pub const LLM_API_KEY_ENV: &str = "SWALI_LLM_API_KEY";
/// Environment variable that overrides `embeddings.api_key`
pub const EMBEDDING_API_KEY_ENV: &str = "SWALI_EMBEDDING_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// `ollama` or `openai`
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Second model used by the embedding A/B experiment
    #[serde(default = "default_comparison_model")]
    pub comparison_model: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_comparison_model() -> String {
    "all-minilm:l12-v2".to_string()
}

pub(crate) fn default_batch_size() -> usize {
    64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_llm_model() -> String {
    "gemini-2.0-flash".to_string()
}

pub(crate) fn default_max_retries() -> u32 {
    3
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of documents handed to generation / scored by evaluation
    pub top_k: usize,
    /// Number of nearest-neighbor candidates pulled before reranking
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,
    #[serde(default = "default_semantic_weight")]
    pub semantic_weight: f64,
    #[serde(default = "default_lexical_weight")]
    pub lexical_weight: f64,
    #[serde(default = "default_rerank")]
    pub rerank: bool,
}

pub(crate) fn default_candidate_pool() -> usize {
    20
}

pub(crate) fn default_semantic_weight() -> f64 {
    0.7
}

pub(crate) fn default_lexical_weight() -> f64 {
    0.3
}

fn default_rerank() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub index_dir: PathBuf,
    pub experiments_dir: PathBuf,
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    "problems".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse, apply environment overrides and validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(SwaliError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Secrets come from the environment when present
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(LLM_API_KEY_ENV) {
            if !key.is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var(EMBEDDING_API_KEY_ENV) {
            if !key.is_empty() {
                self.embeddings.api_key = Some(key);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(SwaliError::ConfigError(
                "retrieval.top_k must be positive".to_string(),
            ));
        }
        if self.retrieval.candidate_pool < self.retrieval.top_k {
            return Err(SwaliError::ConfigError(format!(
                "retrieval.candidate_pool ({}) must be at least retrieval.top_k ({})",
                self.retrieval.candidate_pool, self.retrieval.top_k
            )));
        }
        for (name, weight) in [
            ("semantic_weight", self.retrieval.semantic_weight),
            ("lexical_weight", self.retrieval.lexical_weight),
        ] {
            if !weight.is_finite() {
                return Err(SwaliError::ConfigError(format!(
                    "retrieval.{name} must be finite"
                )));
            }
        }
        if self.embeddings.batch_size == 0 {
            return Err(SwaliError::ConfigError(
                "embeddings.batch_size must be positive".to_string(),
            ));
        }
        match self.embeddings.provider.as_str() {
            "ollama" | "openai" => Ok(()),
            other => Err(SwaliError::ConfigError(format!(
                "unknown embeddings.provider '{other}' (expected 'ollama' or 'openai')"
            ))),
        }
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }

    /// Path of the persisted snapshot for a collection
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.storage.index_dir.join(format!("{collection}.json"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: default_log_directory(),
            },
            embeddings: EmbeddingsConfig {
                provider: "ollama".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                model: "all-minilm:l6-v2".to_string(),
                api_key: None,
                comparison_model: default_comparison_model(),
                batch_size: default_batch_size(),
            },
            llm: LlmConfig {
                endpoint: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
                api_key: None,
                model: default_llm_model(),
                max_retries: default_max_retries(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            retrieval: RetrievalConfig {
                top_k: 5,
                candidate_pool: default_candidate_pool(),
                semantic_weight: default_semantic_weight(),
                lexical_weight: default_lexical_weight(),
                rerank: default_rerank(),
            },
            storage: StorageConfig {
                index_dir: PathBuf::from("data/index"),
                experiments_dir: PathBuf::from("experiments"),
                collection: default_collection(),
            },
        }
    }
}
