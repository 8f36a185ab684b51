use crate::errors::QuillResult;

/// Dense sentence-embedding provider.
///
/// Methods take `&mut self`: the owning service serializes every call behind
/// its lock, so providers need no interior locking of their own.
pub trait IEmbeddingProvider: Send {
    /// Embed a batch of texts.
    fn embed_batch(&mut self, texts: &[String]) -> QuillResult<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed(&mut self, text: &str) -> QuillResult<Vec<f32>> {
        let mut out = self.embed_batch(&[text.to_string()])?;
        Ok(out.pop().unwrap_or_default())
    }

    /// Adapt corpus-dependent weights to `corpus`. Returns true when embeddings
    /// produced from now on may differ from earlier ones. Pretrained
    /// providers ignore the corpus.
    fn fit(&mut self, _corpus: &[String]) -> bool {
        false
    }

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
