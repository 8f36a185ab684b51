use serde::{Deserialize, Serialize};

/// One hit at one retrieval stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageHit {
    pub url: String,
    pub score: f64,
}

/// Per-query diagnostics handed to the query logger: the hits of every
/// stage of the hybrid pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryTrace {
    pub query: String,
    pub dense: Vec<StageHit>,
    pub sparse: Vec<StageHit>,
    pub fused: Vec<StageHit>,
    pub reranked: Vec<StageHit>,
    /// True when reranking was skipped and fused candidates were returned.
    pub rerank_fallback: bool,
    pub latency_ms: u64,
}
