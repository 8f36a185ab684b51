//! SentenceEncoder: the process-wide dense encoder service.
//!
//! Constructed once and shared by `Arc`. The provider is built lazily on the
//! first encode call; every inference goes through one mutex.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use quill_core::config::EmbeddingConfig;
use quill_core::errors::{EmbeddingError, QuillResult};
use quill_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::EmbeddingCache;
use crate::providers;

type SharedProvider = Mutex<Box<dyn IEmbeddingProvider>>;

pub struct SentenceEncoder {
    config: EmbeddingConfig,
    provider: OnceCell<SharedProvider>,
    cache: EmbeddingCache,
}

impl SentenceEncoder {
    /// Encoder whose provider is built from `config` on first use.
    pub fn new(config: EmbeddingConfig) -> Self {
        let cache = EmbeddingCache::new(config.l1_cache_size);
        Self {
            config,
            provider: OnceCell::new(),
            cache,
        }
    }

    /// Encoder around an already constructed provider.
    pub fn with_provider(config: EmbeddingConfig, provider: Box<dyn IEmbeddingProvider>) -> Self {
        let encoder = Self::new(config);
        // A fresh cell is always empty.
        let _ = encoder.provider.set(Mutex::new(provider));
        encoder
    }

    fn provider(&self) -> &SharedProvider {
        self.provider.get_or_init(|| {
            let provider = providers::create_provider(&self.config);
            info!(provider = provider.name(), "sentence encoder initialized");
            Mutex::new(provider)
        })
    }

    /// Whether the provider has been constructed yet.
    pub fn is_loaded(&self) -> bool {
        self.provider.get().is_some()
    }

    pub fn dimensions(&self) -> QuillResult<usize> {
        let guard = self.lock()?;
        Ok(guard.dimensions())
    }

    fn lock(&self) -> QuillResult<std::sync::MutexGuard<'_, Box<dyn IEmbeddingProvider>>> {
        self.provider().lock().map_err(|_| {
            EmbeddingError::LockPoisoned {
                model: self.config.model.clone(),
            }
            .into()
        })
    }

    /// Fit the provider to the corpus about to be indexed. Cached vectors
    /// are dropped when the provider's output changes.
    pub fn fit(&self, corpus: &[String]) -> QuillResult<()> {
        let mut provider = self.lock()?;
        if provider.fit(corpus) {
            self.cache.clear();
            debug!(
                provider = provider.name(),
                documents = corpus.len(),
                "provider fitted, cache cleared"
            );
        }
        Ok(())
    }

    /// Encode `texts`, parallel to the input. Cached texts skip inference;
    /// the rest are embedded in `batch_size` chunks under the provider lock.
    pub fn encode(&self, texts: &[String]) -> QuillResult<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| EmbeddingCache::key(t)).collect();
        let mut resolved: HashMap<&str, Vec<f32>> = HashMap::new();
        let mut pending: Vec<(&str, &String)> = Vec::new();

        for (key, text) in keys.iter().zip(texts) {
            let seen = resolved.contains_key(key.as_str())
                || pending.iter().any(|(k, _)| *k == key.as_str());
            if seen {
                continue;
            }
            match self.cache.get(key) {
                Some(vector) => {
                    resolved.insert(key, vector);
                }
                None => pending.push((key, text)),
            }
        }

        if !pending.is_empty() {
            debug!(
                total = texts.len(),
                misses = pending.len(),
                "encoding uncached texts"
            );
            let batch_size = self.config.batch_size.max(1);
            let mut provider = self.lock()?;
            let expected = provider.dimensions();

            for chunk in pending.chunks(batch_size) {
                let batch: Vec<String> = chunk.iter().map(|(_, t)| (*t).clone()).collect();
                let vectors = provider.embed_batch(&batch)?;
                if vectors.len() != batch.len() {
                    return Err(EmbeddingError::InferenceFailed {
                        reason: format!(
                            "provider returned {} vectors for {} texts",
                            vectors.len(),
                            batch.len()
                        ),
                    }
                    .into());
                }
                for ((key, _), vector) in chunk.iter().zip(vectors) {
                    if vector.len() != expected {
                        return Err(EmbeddingError::DimensionMismatch {
                            expected,
                            actual: vector.len(),
                        }
                        .into());
                    }
                    self.cache.insert((*key).to_string(), vector.clone());
                    resolved.insert(key, vector);
                }
            }
        }

        Ok(keys
            .iter()
            .map(|k| resolved.get(k.as_str()).cloned().unwrap_or_default())
            .collect())
    }

    pub fn encode_one(&self, text: &str) -> QuillResult<Vec<f32>> {
        let mut out = self.encode(&[text.to_string()])?;
        Ok(out.pop().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TfIdfFallback;

    fn config() -> EmbeddingConfig {
        EmbeddingConfig {
            provider: "tfidf".to_string(),
            dimensions: 32,
            batch_size: 2,
            ..EmbeddingConfig::default()
        }
    }

    #[test]
    fn provider_is_built_lazily() {
        let encoder = SentenceEncoder::new(config());
        assert!(!encoder.is_loaded());
        let v = encoder.encode_one("lazy model").unwrap();
        assert!(encoder.is_loaded());
        assert_eq!(v.len(), 32);
    }

    #[test]
    fn output_is_parallel_to_input_with_duplicates() {
        let encoder = SentenceEncoder::with_provider(config(), Box::new(TfIdfFallback::new(32)));
        let texts: Vec<String> = ["alpha beta", "gamma delta", "alpha beta", "epsilon zeta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let out = encoder.encode(&texts).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], out[2]);
        assert_ne!(out[0], out[1]);
    }

    #[test]
    fn fitting_invalidates_cached_vectors() {
        let encoder = SentenceEncoder::with_provider(config(), Box::new(TfIdfFallback::new(32)));
        let before = encoder.encode_one("alpha beta").unwrap();
        encoder
            .fit(&["alpha gamma".to_string(), "alpha delta".to_string()])
            .unwrap();
        let after = encoder.encode_one("alpha beta").unwrap();
        assert_ne!(before, after);
    }
}
