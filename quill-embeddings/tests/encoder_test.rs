//! SentenceEncoder integration tests: caching, batching, and lock sharing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use quill_core::config::EmbeddingConfig;
use quill_core::errors::{EmbeddingError, QuillError, QuillResult};
use quill_core::traits::IEmbeddingProvider;
use quill_embeddings::{SentenceEncoder, TfIdfFallback};

/// Wraps TF-IDF and counts how many texts reach the model.
struct CountingProvider {
    inner: TfIdfFallback,
    texts_seen: Arc<AtomicUsize>,
    batches: Arc<AtomicUsize>,
}

impl IEmbeddingProvider for CountingProvider {
    fn embed_batch(&mut self, texts: &[String]) -> QuillResult<Vec<Vec<f32>>> {
        self.texts_seen.fetch_add(texts.len(), Ordering::SeqCst);
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Returns vectors of the wrong width.
struct BrokenProvider;

impl IEmbeddingProvider for BrokenProvider {
    fn embed_batch(&mut self, texts: &[String]) -> QuillResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; 3]).collect())
    }

    fn dimensions(&self) -> usize {
        8
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn config(batch_size: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        dimensions: 16,
        batch_size,
        ..EmbeddingConfig::default()
    }
}

fn counting_encoder(batch_size: usize) -> (SentenceEncoder, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let texts_seen = Arc::new(AtomicUsize::new(0));
    let batches = Arc::new(AtomicUsize::new(0));
    let provider = CountingProvider {
        inner: TfIdfFallback::new(16),
        texts_seen: Arc::clone(&texts_seen),
        batches: Arc::clone(&batches),
    };
    (
        SentenceEncoder::with_provider(config(batch_size), Box::new(provider)),
        texts_seen,
        batches,
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn second_encode_is_served_from_cache() {
    let (encoder, seen, _) = counting_encoder(8);
    let texts = strings(&["coral reefs", "deep sea vents"]);
    let first = encoder.encode(&texts).unwrap();
    let second = encoder.encode(&texts).unwrap();
    assert_eq!(first, second);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn misses_are_chunked_by_batch_size() {
    let (encoder, seen, batches) = counting_encoder(2);
    let texts = strings(&["a1 one", "b2 two", "c3 three", "d4 four", "e5 five"]);
    encoder.encode(&texts).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 5);
    assert_eq!(batches.load(Ordering::SeqCst), 3);
}

#[test]
fn duplicate_texts_are_embedded_once() {
    let (encoder, seen, _) = counting_encoder(8);
    let out = encoder
        .encode(&strings(&["same text", "same text", "other text"]))
        .unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn wrong_width_vectors_are_rejected() {
    let encoder = SentenceEncoder::with_provider(config(4), Box::new(BrokenProvider));
    let err = encoder.encode(&strings(&["anything"])).unwrap_err();
    assert!(matches!(
        err,
        QuillError::Embedding(EmbeddingError::DimensionMismatch { expected: 8, actual: 3 })
    ));
}

#[test]
fn concurrent_callers_share_one_model() {
    let (encoder, seen, _) = counting_encoder(4);
    let encoder = Arc::new(encoder);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let encoder = Arc::clone(&encoder);
            std::thread::spawn(move || {
                encoder
                    .encode(&[format!("worker {i} text"), "shared text".to_string()])
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().len(), 2);
    }
    // Four unique texts plus the shared one, which may race past the cache.
    let total = seen.load(Ordering::SeqCst);
    assert!((5..=8).contains(&total), "unexpected model calls: {total}");
}
