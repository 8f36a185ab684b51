/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("search backend {backend} failed: {reason}")]
    BackendFailed { backend: String, reason: String },

    #[error("unknown backend: {name}")]
    UnknownBackend { name: String },
}
