//! Second-stage reranking with a pairwise relevance model.

#[cfg(feature = "fastembed")]
pub mod fastembed_reranker;
pub mod reranker;
pub mod term_overlap;

#[cfg(feature = "fastembed")]
pub use fastembed_reranker::FastEmbedReranker;
pub use reranker::{
    apply_threshold, create_relevance_model, CrossEncoder, RerankOutcome, RerankerKind,
};
pub use term_overlap::TermOverlapScorer;
