// Single source of truth for all default values.

// --- Runner ---
pub const DEFAULT_MAX_THREAD_NUM: usize = 10;
pub const DEFAULT_CONFIG_FILENAME: &str = "quill.toml";

// --- Retrieval ---
pub const DEFAULT_VECTOR_WEIGHT: f64 = 0.5;
pub const DEFAULT_BM25_WEIGHT: f64 = 0.5;
pub const DEFAULT_INITIAL_RETRIEVAL_K: usize = 150;
pub const DEFAULT_FINAL_CONTEXT_K: usize = 20;
pub const DEFAULT_RERANKER_THRESHOLD: f64 = 0.5;
pub const DEFAULT_SEARCH_TOP_K: usize = 3;
pub const DEFAULT_BM25_K1: f64 = 1.5;
pub const DEFAULT_BM25_B: f64 = 0.75;
pub const DEFAULT_BM25_EPSILON: f64 = 0.25;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "tfidf";
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 64;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;

// --- Reranker ---
pub const DEFAULT_RERANKER_PROVIDER: &str = "term-overlap";
pub const DEFAULT_RERANKER_MODEL: &str = "BAAI/bge-reranker-base";
pub const DEFAULT_RERANKER_BATCH_SIZE: usize = 32;

// --- Curation ---
pub const DEFAULT_MAX_CONV_TURN: usize = 3;
pub const DEFAULT_MAX_PERSPECTIVE: usize = 3;
pub const DEFAULT_MAX_SEARCH_QUERIES_PER_TURN: usize = 3;

// --- Outline ---
pub const DEFAULT_RATING_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RATING_BACKOFF_MS: u64 = 2_000;
pub const DEFAULT_FUZZY_MATCH_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MAX_HEADING_DEPTH: usize = 3;

// --- Language model ---
pub const DEFAULT_LM_PROVIDER: &str = "openai";
pub const DEFAULT_LM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LM_MAX_TOKENS: u32 = 1_500;
pub const DEFAULT_LM_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_LM_TOP_P: f32 = 0.9;
pub const DEFAULT_LM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LM_MAX_RETRIES: u32 = 3;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 50_000;
