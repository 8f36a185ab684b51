//! Lexical relevance model used when no cross-encoder is configured.

use std::collections::HashSet;

use quill_core::errors::QuillResult;
use quill_core::traits::IRelevanceModel;

/// Scores a passage by the fraction of distinct query terms it contains.
#[derive(Debug, Default)]
pub struct TermOverlapScorer;

impl TermOverlapScorer {
    fn terms(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect()
    }
}

impl IRelevanceModel for TermOverlapScorer {
    fn score(&mut self, query: &str, passages: &[&str]) -> QuillResult<Vec<f64>> {
        let query_terms = Self::terms(query);
        if query_terms.is_empty() {
            return Ok(vec![0.0; passages.len()]);
        }
        Ok(passages
            .iter()
            .map(|p| {
                let passage_terms = Self::terms(p);
                let hits = query_terms.intersection(&passage_terms).count();
                hits as f64 / query_terms.len() as f64
            })
            .collect())
    }

    fn name(&self) -> &str {
        "term-overlap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_overlap_scores_one() {
        let mut m = TermOverlapScorer;
        let scores = m.score("Coral reefs", &["reefs of coral", "desert sand"]).unwrap();
        assert_eq!(scores, vec![1.0, 0.0]);
    }

    #[test]
    fn empty_query_scores_zero() {
        let mut m = TermOverlapScorer;
        assert_eq!(m.score("  ", &["a"]).unwrap(), vec![0.0]);
    }
}
