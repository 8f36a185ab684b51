//! Provider registry.
//!
//! Providers are a closed set selected by the `embedding.provider` tag. An
//! unknown tag, or a model that fails to load, falls back to [`TfIdfFallback`].

#[cfg(feature = "fastembed")]
pub mod fastembed_provider;
pub mod tfidf_fallback;

#[cfg(feature = "fastembed")]
pub use fastembed_provider::FastEmbedProvider;
pub use tfidf_fallback::TfIdfFallback;

use quill_core::config::EmbeddingConfig;
use quill_core::traits::IEmbeddingProvider;
use tracing::{info, warn};

/// Embedding provider variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    FastEmbed,
    TfIdf,
}

impl ProviderKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "fastembed" | "onnx" => Some(Self::FastEmbed),
            "tfidf" | "tf-idf" => Some(Self::TfIdf),
            _ => None,
        }
    }
}

/// Build the configured provider.
pub fn create_provider(config: &EmbeddingConfig) -> Box<dyn IEmbeddingProvider> {
    let kind = ProviderKind::parse(&config.provider).unwrap_or_else(|| {
        warn!(provider = %config.provider, "unknown embedding provider, using TF-IDF");
        ProviderKind::TfIdf
    });

    match kind {
        ProviderKind::FastEmbed => load_fastembed(config),
        ProviderKind::TfIdf => {
            info!(provider = "tfidf", dims = config.dimensions, "using TF-IDF embedding provider");
            Box::new(TfIdfFallback::new(config.dimensions))
        }
    }
}

#[cfg(feature = "fastembed")]
fn load_fastembed(config: &EmbeddingConfig) -> Box<dyn IEmbeddingProvider> {
    match FastEmbedProvider::load(&config.model, config.batch_size) {
        Ok(p) => {
            info!(provider = "fastembed", model = %config.model, "embedding provider loaded");
            Box::new(p)
        }
        Err(e) => {
            warn!(error = %e, "fastembed provider failed to load, falling back to TF-IDF");
            Box::new(TfIdfFallback::new(config.dimensions))
        }
    }
}

#[cfg(not(feature = "fastembed"))]
fn load_fastembed(config: &EmbeddingConfig) -> Box<dyn IEmbeddingProvider> {
    warn!("fastembed provider requested but the `fastembed` feature is disabled, using TF-IDF");
    Box::new(TfIdfFallback::new(config.dimensions))
}
