//! Corpus-fitted TF-IDF provider.
//!
//! Words and adjacent word pairs are hashed into `dimensions` buckets. Until
//! [`IEmbeddingProvider::fit`] is called every feature weighs the same; after
//! it, a feature is weighted by its smoothed inverse document frequency over
//! the fitted snippets, so boilerplate shared by every source stops dominating
//! the similarity. Needs no model files, which makes it the offline default.

use std::collections::{HashMap, HashSet};

use quill_core::errors::QuillResult;
use quill_core::traits::IEmbeddingProvider;

pub struct TfIdfFallback {
    dimensions: usize,
    idf: HashMap<String, f32>,
    /// Weight of a feature absent from the fitted corpus.
    unseen_idf: f32,
}

impl TfIdfFallback {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            idf: HashMap::new(),
            unseen_idf: 1.0,
        }
    }

    pub fn is_fitted(&self) -> bool {
        !self.idf.is_empty()
    }

    /// `ln((1 + n) / (1 + df)) + 1` over the fitted corpus; 1.0 before fitting.
    pub fn idf(&self, feature: &str) -> f32 {
        self.idf.get(feature).copied().unwrap_or(self.unseen_idf)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for feature in features(text) {
            *counts.entry(feature).or_default() += 1;
        }

        let mut vector = vec![0.0f32; self.dimensions];
        for (feature, count) in &counts {
            let tf = 1.0 + (*count as f32).ln();
            vector[bucket(feature, self.dimensions)] += tf * self.idf(feature);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

/// Lower-cased alphanumeric words, then each adjacent pair as `"a b"`.
fn features(text: &str) -> Vec<String> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let pairs: Vec<String> = words.windows(2).map(|w| format!("{} {}", w[0], w[1])).collect();
    words.into_iter().chain(pairs).collect()
}

fn bucket(feature: &str, dimensions: usize) -> usize {
    let hash = blake3::hash(feature.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    (u64::from_le_bytes(head) % dimensions as u64) as usize
}

impl IEmbeddingProvider for TfIdfFallback {
    fn embed_batch(&mut self, texts: &[String]) -> QuillResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    /// Recompute document frequencies over `corpus`, one document per entry.
    fn fit(&mut self, corpus: &[String]) -> bool {
        let mut df: HashMap<String, u32> = HashMap::new();
        for document in corpus {
            let unique: HashSet<String> = features(document).into_iter().collect();
            for feature in unique {
                *df.entry(feature).or_default() += 1;
            }
        }
        let n = corpus.len() as f32;
        self.idf = df
            .into_iter()
            .map(|(feature, count)| (feature, ((1.0 + n) / (1.0 + count as f32)).ln() + 1.0))
            .collect();
        self.unseen_idf = (1.0 + n).ln() + 1.0;
        true
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "tfidf-fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn empty_text_returns_zero_vector() {
        let mut p = TfIdfFallback::new(128);
        let v = p.embed("").unwrap();
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn output_is_unit_length() {
        let mut p = TfIdfFallback::new(256);
        let v = p.embed("Bleaching follows marine heatwaves [1].").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn word_pairs_are_features() {
        assert_eq!(
            features("Coral-reef bleaching"),
            vec!["coral", "reef", "bleaching", "coral reef", "reef bleaching"]
        );
    }

    #[test]
    fn related_snippets_score_higher() {
        let mut p = TfIdfFallback::new(256);
        let a = p.embed("volcano eruption lava").unwrap();
        let b = p.embed("lava flows after the volcano eruption").unwrap();
        let c = p.embed("baroque music composers").unwrap();
        assert!(dot(&a, &b) > dot(&a, &c));
    }

    #[test]
    fn fitting_weights_rare_features_above_common_ones() {
        let mut p = TfIdfFallback::new(64);
        assert!(!p.is_fitted());
        assert_eq!(p.idf("reef"), 1.0);

        p.fit(&corpus(&["the reef is warm", "the reef is cold", "the reef bleaches"]));
        assert!(p.is_fitted());
        assert!((p.idf("reef") - 1.0).abs() < 1e-6);
        assert!((p.idf("bleaches") - (2.0f32.ln() + 1.0)).abs() < 1e-6);
        assert!(p.idf("spawning") > p.idf("bleaches"));
    }

    #[test]
    fn fitting_changes_embeddings() {
        let mut p = TfIdfFallback::new(64);
        let before = p.embed("reef bleaches").unwrap();
        p.fit(&corpus(&["the reef is warm", "the reef bleaches"]));
        let after = p.embed("reef bleaches").unwrap();
        assert_ne!(before, after);
    }
}
