use crate::errors::QuillResult;

/// Pairwise (query, passage) relevance model, i.e. a cross-encoder.
pub trait IRelevanceModel: Send {
    /// Score every passage against `query`. The output is parallel to `passages`.
    fn score(&mut self, query: &str, passages: &[&str]) -> QuillResult<Vec<f64>>;

    fn name(&self) -> &str;
}
