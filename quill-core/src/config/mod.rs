//! Top-level Quill configuration with layered resolution.

pub mod curation_config;
pub mod defaults;
pub mod embedding_config;
pub mod generation_config;
pub mod language_model_config;
pub mod observability_config;
pub mod outline_config;
pub mod retrieval_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use curation_config::CurationConfig;
pub use embedding_config::{EmbeddingConfig, RerankerConfig};
pub use generation_config::{GenerationConfig, PolishConfig};
pub use language_model_config::{LanguageModelConfig, ModelSpec};
pub use observability_config::ObservabilityConfig;
pub use outline_config::OutlineConfig;
pub use retrieval_config::RetrievalConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`QUILL_*`)
/// 2. TOML file (`quill.toml`)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuillConfig {
    /// Worker count for the parallel phases.
    pub max_thread_num: usize,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub reranker: RerankerConfig,
    pub curation: CurationConfig,
    pub outline: OutlineConfig,
    pub generation: GenerationConfig,
    pub polish: PolishConfig,
    pub language_model: LanguageModelConfig,
    pub observability: ObservabilityConfig,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            max_thread_num: defaults::DEFAULT_MAX_THREAD_NUM,
            retrieval: RetrievalConfig::default(),
            embedding: EmbeddingConfig::default(),
            reranker: RerankerConfig::default(),
            curation: CurationConfig::default(),
            outline: OutlineConfig::default(),
            generation: GenerationConfig::default(),
            polish: PolishConfig::default(),
            language_model: LanguageModelConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl QuillConfig {
    /// Load configuration: defaults, then `path` if it exists, then `QUILL_*`
    /// environment overrides. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            }
            None => {
                let local = Path::new(defaults::DEFAULT_CONFIG_FILENAME);
                if local.exists() {
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `QUILL_*` overrides through `lookup` (the process environment in
    /// [`QuillConfig::load`]). Unparseable values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("QUILL_MAX_THREAD_NUM").and_then(|v| v.parse().ok()) {
            self.max_thread_num = v;
        }
        if let Some(v) = lookup("QUILL_MAX_CONV_TURN").and_then(|v| v.parse().ok()) {
            self.curation.max_conv_turn = v;
        }
        if let Some(v) = lookup("QUILL_MAX_PERSPECTIVE").and_then(|v| v.parse().ok()) {
            self.curation.max_perspective = v;
        }
        if let Some(v) = lookup("QUILL_RERANKER_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.retrieval.reranker_threshold = v;
        }
        if let Some(v) = lookup("QUILL_SEARCH_BACKEND") {
            self.retrieval.backend = v;
        }
        if let Some(v) = lookup("QUILL_EMBEDDING_PROVIDER") {
            self.embedding.provider = v;
        }
        if let Some(v) = lookup("QUILL_RERANKER_PROVIDER") {
            self.reranker.provider = v;
        }
        if let Some(v) = lookup("QUILL_LM_PROVIDER") {
            self.language_model.default.provider = v;
        }
        if let Some(v) = lookup("QUILL_LM_MODEL") {
            self.language_model.default.model = v;
        }
        if let Some(v) = lookup("QUILL_LOG") {
            self.observability.log_level = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_thread_num == 0 {
            return Err(invalid("max_thread_num", "must be greater than 0"));
        }
        for (field, value) in [
            ("retrieval.vector_weight", self.retrieval.vector_weight),
            ("retrieval.bm25_weight", self.retrieval.bm25_weight),
            ("retrieval.reranker_threshold", self.retrieval.reranker_threshold),
            ("outline.fuzzy_match_threshold", self.outline.fuzzy_match_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        for (field, value) in [
            ("retrieval.initial_retrieval_k", self.retrieval.initial_retrieval_k),
            ("retrieval.final_context_k", self.retrieval.final_context_k),
            ("retrieval.search_top_k", self.retrieval.search_top_k),
            ("generation.initial_retrieval_k", self.generation.initial_retrieval_k),
            ("generation.final_context_k", self.generation.final_context_k),
            ("embedding.dimensions", self.embedding.dimensions),
            ("outline.max_heading_depth", self.outline.max_heading_depth),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }
        if self.outline.rating_max_attempts == 0 {
            return Err(invalid("outline.rating_max_attempts", "must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_documented_values() {
        let config = QuillConfig::default();
        assert!((config.retrieval.vector_weight - 0.5).abs() < f64::EPSILON);
        assert!((config.retrieval.bm25_weight - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.retrieval.initial_retrieval_k, 150);
        assert_eq!(config.retrieval.final_context_k, 20);
        assert!((config.retrieval.reranker_threshold - 0.5).abs() < f64::EPSILON);
        assert!((config.outline.fuzzy_match_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.outline.rating_max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = QuillConfig::from_toml(
            r#"
            max_thread_num = 4

            [retrieval]
            reranker_threshold = 0.7

            [language_model.roles.outline]
            model = "gpt-4o"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_thread_num, 4);
        assert!((config.retrieval.reranker_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.retrieval.final_context_k, 20);
        assert_eq!(config.language_model.spec_for("outline").model, "gpt-4o");
        assert_eq!(
            config.language_model.spec_for("article").model,
            defaults::DEFAULT_LM_MODEL
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = QuillConfig::from_toml("max_thread_num = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("QUILL_MAX_THREAD_NUM", "2"),
            ("QUILL_MAX_CONV_TURN", "5"),
            ("QUILL_SEARCH_BACKEND", "in-memory"),
            ("QUILL_RERANKER_THRESHOLD", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let mut config = QuillConfig::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.max_thread_num, 2);
        assert_eq!(config.curation.max_conv_turn, 5);
        assert_eq!(config.retrieval.backend, "in-memory");
        assert!((config.retrieval.reranker_threshold - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn validation_rejects_out_of_range_weights() {
        let mut config = QuillConfig::default();
        config.retrieval.vector_weight = 1.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationFailed { ref field, .. } if field == "retrieval.vector_weight"
        ));
    }

    #[test]
    fn validation_rejects_zero_threads() {
        let mut config = QuillConfig::default();
        config.max_thread_num = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file_and_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[curation]\nmax_perspective = 1\n").unwrap();
        let config = QuillConfig::load(Some(&path)).unwrap();
        assert_eq!(config.curation.max_perspective, 1);

        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            QuillConfig::load(Some(&missing)),
            Err(ConfigError::FileNotFound { .. })
        ));
    }
}
