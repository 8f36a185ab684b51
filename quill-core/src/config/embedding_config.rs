use serde::{Deserialize, Serialize};

use super::defaults;

/// Dense sentence-encoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "fastembed" or "tfidf".
    pub provider: String,
    /// Model name understood by the provider.
    pub model: String,
    /// Output dimensions.
    pub dimensions: usize,
    /// Batch size for snippet encoding.
    pub batch_size: usize,
    /// L1 in-memory cache max entries.
    pub l1_cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            batch_size: defaults::DEFAULT_EMBEDDING_BATCH_SIZE,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
        }
    }
}

/// Cross-encoder reranker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankerConfig {
    /// Reranker provider: "fastembed" or "term-overlap".
    pub provider: String,
    pub model: String,
    pub batch_size: usize,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_RERANKER_PROVIDER.to_string(),
            model: defaults::DEFAULT_RERANKER_MODEL.to_string(),
            batch_size: defaults::DEFAULT_RERANKER_BATCH_SIZE,
        }
    }
}
