//! # quill-embeddings
//!
//! Dense sentence encoding for the Evidence Store.
//!
//! ## Architecture
//!
//! ```text
//! SentenceEncoder (shared service, Arc)
//! ├── provider: OnceCell<Mutex<Box<dyn IEmbeddingProvider>>>
//! │   ├── FastEmbedProvider (feature "fastembed", local ONNX models)
//! │   └── TfIdfFallback (always available)
//! └── EmbeddingCache (moka, keyed by blake3 of the text)
//! ```
//!
//! The provider is built on first use and every inference call is serialized
//! through its mutex, so concurrent workers only contend on the model itself.

pub mod cache;
pub mod encoder;
pub mod providers;

pub use cache::EmbeddingCache;
pub use encoder::SentenceEncoder;
pub use providers::{create_provider, ProviderKind, TfIdfFallback};

#[cfg(feature = "fastembed")]
pub use providers::FastEmbedProvider;
