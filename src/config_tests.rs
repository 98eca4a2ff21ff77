//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::errors::SwaliError;

    const MINIMAL_TOML: &str = r#"
[logging]
level = "debug"

[embeddings]
provider = "ollama"
endpoint = "http://localhost:11434"
model = "all-minilm:l6-v2"

[llm]
endpoint = "http://localhost:8080/v1"

[retrieval]
top_k = 5

[storage]
index_dir = "data/index"
experiments_dir = "experiments"
"#;

    // ====== Default Value Tests ======

    #[test]
    fn test_default_weights() {
        assert!((default_semantic_weight() - 0.7).abs() < f64::EPSILON);
        assert!((default_lexical_weight() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.storage.collection, "problems");
    }

    // ====== Parsing Tests ======

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let config = AppConfig::from_toml_str(MINIMAL_TOML).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.retrieval.candidate_pool, default_candidate_pool());
        assert_eq!(config.embeddings.batch_size, default_batch_size());
        assert_eq!(config.llm.max_retries, default_max_retries());
        assert!(config.retrieval.rerank);
        assert_eq!(config.storage.collection, "problems");
    }

    #[test]
    fn test_collection_path() {
        let config = AppConfig::from_toml_str(MINIMAL_TOML).unwrap();
        let path = config.collection_path("exp_embed_a");
        assert!(path.ends_with("exp_embed_a.json"));
        assert!(path.starts_with("data/index"));
    }

    // ====== Validation Tests ======

    #[test]
    fn test_zero_top_k_rejected() {
        let toml = MINIMAL_TOML.replace("top_k = 5", "top_k = 0");
        let err = AppConfig::from_toml_str(&toml).unwrap_err();
        assert!(matches!(err, SwaliError::ConfigError(_)));
    }

    #[test]
    fn test_candidate_pool_smaller_than_top_k_rejected() {
        let toml = MINIMAL_TOML.replace("top_k = 5", "top_k = 5\ncandidate_pool = 3");
        let err = AppConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("candidate_pool"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let toml = MINIMAL_TOML.replace("provider = \"ollama\"", "provider = \"cohere\"");
        let err = AppConfig::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("cohere"));
    }

    #[test]
    fn test_missing_section_is_toml_error() {
        let err = AppConfig::from_toml_str("[logging]\nlevel = \"info\"\n").unwrap_err();
        assert!(matches!(err, SwaliError::TomlParsing(_)));
    }
}
