use crate::errors::QuillResult;
use crate::models::Information;

/// External search provider exposed by the host.
pub trait IRetrievalBackend: Send + Sync {
    /// Run `queries`, returning up to `k` documents per query, never one whose
    /// URL is in `exclude_urls`.
    fn search(
        &self,
        queries: &[String],
        k: usize,
        exclude_urls: &[String],
    ) -> QuillResult<Vec<Information>>;

    fn name(&self) -> &str;
}
