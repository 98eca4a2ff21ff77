use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwaliError {
    /// Caller supplied a value outside a documented precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parallel result sequences from the vector index disagree in length
    #[error("Misaligned results: {field} has {actual} entries, expected {expected}")]
    MisalignedResults {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Run already logged: {0}")]
    RunAlreadyLogged(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwaliError {
    /// Bad input shape: the caller broke a precondition.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::MisalignedResults { .. } | Self::ConfigError(_)
        )
    }

    /// A strategy or external backend failed while doing its job.
    pub fn is_backend_error(&self) -> bool {
        matches!(
            self,
            Self::Retrieval(_) | Self::Embedding(_) | Self::Llm(_) | Self::HttpError(_)
        )
    }
}

impl From<reqwest::Error> for SwaliError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SwaliError>;
