//! # quill-retrieval
//!
//! The Evidence Store and its query engine.
//!
//! ## Architecture
//!
//! ```text
//! InformationTable (Evidence Store)
//! ├── url → Information (merge = snippet set-union)
//! ├── PreparedIndex (built by prepare(), rebuilt as a unit)
//! │   ├── flattened (url, snippet) entries
//! │   ├── DenseIndex (SentenceEncoder vectors, cosine)
//! │   └── Bm25Index (Okapi, max-normalized)
//! ├── fusion (weighted score fusion by URL)
//! └── CrossEncoder (lazy, lock-guarded relevance model, threshold filter)
//!
//! backend
//! ├── ExaBackend (HTTP search)
//! └── InMemoryBackend (fixed corpus, word overlap)
//! ```

pub mod backend;
pub mod information_table;
pub mod ranking;
pub mod search;

pub use backend::{create_backend, BackendKind, ExaBackend, InMemoryBackend};
pub use information_table::{InformationTable, RetrieveParams};
pub use ranking::{CrossEncoder, RerankOutcome};
