//! First-stage search over the flattened snippet corpus.

pub mod bm25;
pub mod fusion;
pub mod vector_search;

pub use bm25::{Bm25Index, Bm25Params};
pub use fusion::fuse;
pub use vector_search::DenseIndex;

/// Lower-case whitespace tokenization shared by the sparse index and queries.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}
