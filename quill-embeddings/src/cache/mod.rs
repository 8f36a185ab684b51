//! L1 in-memory embedding cache using moka.
//!
//! TinyLFU admission, bounded entry count, idle TTL.

use std::time::Duration;

use moka::sync::Cache;

/// In-memory embedding cache keyed by the blake3 hash of the encoded text.
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    /// Cache key for `text`.
    pub fn key(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = EmbeddingCache::new(100);
        let key = EmbeddingCache::key("hello");
        cache.insert(key.clone(), vec![1.0, 2.0]);
        assert_eq!(cache.get(&key), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn keys_are_content_addressed() {
        assert_eq!(EmbeddingCache::key("a b"), EmbeddingCache::key("a b"));
        assert_ne!(EmbeddingCache::key("a b"), EmbeddingCache::key("a c"));
    }

    #[test]
    fn clear_drops_entries() {
        let cache = EmbeddingCache::new(10);
        cache.insert("k".to_string(), vec![1.0]);
        cache.clear();
        assert_eq!(cache.get("k"), None);
    }
}
