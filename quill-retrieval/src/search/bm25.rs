//! Okapi BM25 over the snippet corpus.
//!
//! Built once per `prepare()`. Terms whose raw IDF is negative (present in more
//! than half the corpus) get `epsilon * mean_idf` instead.

use std::collections::HashMap;

use super::tokenize;

#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
    pub epsilon: f64,
}

#[derive(Debug, Default)]
pub struct Bm25Index {
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<usize>,
    avg_doc_len: f64,
    idf: HashMap<String, f64>,
    k1: f64,
    b: f64,
}

impl Bm25Index {
    pub fn build(corpus: &[String], params: Bm25Params) -> Self {
        let mut term_freqs = Vec::with_capacity(corpus.len());
        let mut doc_lens = Vec::with_capacity(corpus.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in corpus {
            let tokens = tokenize(doc);
            doc_lens.push(tokens.len());
            let mut tf: HashMap<String, u32> = HashMap::new();
            for tok in tokens {
                *tf.entry(tok).or_default() += 1;
            }
            for term in tf.keys() {
                *doc_freq.entry(term.clone()).or_default() += 1;
            }
            term_freqs.push(tf);
        }

        let n = corpus.len() as f64;
        let avg_doc_len = if corpus.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / n
        };

        let mut idf: HashMap<String, f64> = HashMap::with_capacity(doc_freq.len());
        let mut idf_sum = 0.0;
        let mut negative: Vec<String> = Vec::new();
        for (term, df) in doc_freq {
            let df = df as f64;
            let value = ((n - df + 0.5) / (df + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative.push(term.clone());
            }
            idf.insert(term, value);
        }
        let mean_idf = if idf.is_empty() { 0.0 } else { idf_sum / idf.len() as f64 };
        let floor = if mean_idf > 0.0 {
            params.epsilon * mean_idf
        } else {
            params.epsilon
        };
        for term in negative {
            idf.insert(term, floor);
        }

        Self {
            term_freqs,
            doc_lens,
            avg_doc_len,
            idf,
            k1: params.k1,
            b: params.b,
        }
    }

    pub fn len(&self) -> usize {
        self.term_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }

    /// Raw BM25 score of every document, parallel to the corpus.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let terms = tokenize(query);
        let avg = if self.avg_doc_len > 0.0 { self.avg_doc_len } else { 1.0 };

        self.term_freqs
            .iter()
            .zip(&self.doc_lens)
            .map(|(tf, &len)| {
                let norm = 1.0 - self.b + self.b * len as f64 / avg;
                terms
                    .iter()
                    .map(|term| {
                        let freq = tf.get(term).copied().unwrap_or(0) as f64;
                        if freq == 0.0 {
                            return 0.0;
                        }
                        let idf = self.idf.get(term).copied().unwrap_or(0.0);
                        idf * (freq * (self.k1 + 1.0)) / (freq + self.k1 * norm)
                    })
                    .sum()
            })
            .collect()
    }

    /// Top `k` documents by score, normalized to [0, 1] by the corpus-wide
    /// maximum (a maximum ≤ 0 is treated as 1.0). Documents scoring zero are
    /// still eligible, so the result has `min(k, len)` entries.
    pub fn top_k_normalized(&self, query: &str, k: usize) -> Vec<(usize, f64)> {
        let scores = self.scores(query);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let max = if max > 0.0 { max } else { 1.0 };

        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .map(|s| (s / max).clamp(0.0, 1.0))
            .enumerate()
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        ranked
    }
}
