//! Fixed-corpus backend for offline runs and tests.

use std::collections::HashSet;

use quill_core::errors::QuillResult;
use quill_core::traits::IRetrievalBackend;
use quill_core::Information;

/// Ranks a fixed corpus by the number of distinct query words each document
/// (title plus snippets) contains. Documents with no overlap are never returned.
pub struct InMemoryBackend {
    corpus: Vec<Information>,
}

impl InMemoryBackend {
    pub fn new(corpus: Vec<Information>) -> Self {
        Self { corpus }
    }

    fn words(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .map(|w| w.to_lowercase())
            .collect()
    }

    fn search_one(&self, query: &str, k: usize, exclude_urls: &[String]) -> Vec<&Information> {
        let query_words = Self::words(query);
        let mut scored: Vec<(usize, &Information)> = self
            .corpus
            .iter()
            .filter(|doc| !exclude_urls.contains(&doc.url))
            .filter_map(|doc| {
                let mut doc_words = Self::words(&doc.title);
                for s in &doc.snippets {
                    doc_words.extend(Self::words(s));
                }
                let overlap = query_words.intersection(&doc_words).count();
                (overlap > 0).then_some((overlap, doc))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(k).map(|(_, doc)| doc).collect()
    }
}

impl IRetrievalBackend for InMemoryBackend {
    fn search(
        &self,
        queries: &[String],
        k: usize,
        exclude_urls: &[String],
    ) -> QuillResult<Vec<Information>> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for query in queries {
            for doc in self.search_one(query, k, exclude_urls) {
                if seen.insert(doc.url.as_str()) {
                    out.push(doc.clone());
                }
            }
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
