mod config_error;
mod embedding_error;
mod language_model_error;
mod outline_error;
mod retrieval_error;

pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use language_model_error::LanguageModelError;
pub use outline_error::OutlineError;
pub use retrieval_error::RetrievalError;

/// Top-level error for every Quill crate.
///
/// Only [`QuillError::EmptyInput`] is meant to reach the host application;
/// the pipeline degrades every other failure to a logged partial result.
#[derive(Debug, thiserror::Error)]
pub enum QuillError {
    #[error("no topic and no source text provided")]
    EmptyInput,

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    LanguageModel(#[from] LanguageModelError),

    #[error(transparent)]
    Outline(#[from] OutlineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {unit} panicked: {message}")]
    WorkerPanicked { unit: String, message: String },
}

pub type QuillResult<T> = Result<T, QuillError>;
