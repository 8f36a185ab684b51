use serde::{Deserialize, Serialize};

use super::defaults;

/// Hybrid retrieval and reranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Weight of the dense (cosine) score in fusion.
    pub vector_weight: f64,
    /// Weight of the normalized BM25 score in fusion.
    pub bm25_weight: f64,
    /// Fused candidates kept before reranking.
    pub initial_retrieval_k: usize,
    /// Reranked results kept per query.
    pub final_context_k: usize,
    /// Cross-encoder scores below this are discarded.
    pub reranker_threshold: f64,
    /// Documents requested from the search backend per expert turn.
    pub search_top_k: usize,
    pub bm25_k1: f64,
    pub bm25_b: f64,
    pub bm25_epsilon: f64,
    /// Search backend tag: "exa" or "in-memory".
    pub backend: String,
    /// Environment variable holding the backend API key.
    pub backend_api_key_env: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            vector_weight: defaults::DEFAULT_VECTOR_WEIGHT,
            bm25_weight: defaults::DEFAULT_BM25_WEIGHT,
            initial_retrieval_k: defaults::DEFAULT_INITIAL_RETRIEVAL_K,
            final_context_k: defaults::DEFAULT_FINAL_CONTEXT_K,
            reranker_threshold: defaults::DEFAULT_RERANKER_THRESHOLD,
            search_top_k: defaults::DEFAULT_SEARCH_TOP_K,
            bm25_k1: defaults::DEFAULT_BM25_K1,
            bm25_b: defaults::DEFAULT_BM25_B,
            bm25_epsilon: defaults::DEFAULT_BM25_EPSILON,
            backend: "exa".to_string(),
            backend_api_key_env: "EXA_API_KEY".to_string(),
        }
    }
}
