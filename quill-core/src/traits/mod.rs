mod embedding;
mod language_model;
mod query_logger;
mod relevance;
mod retrieval_backend;

pub use embedding::IEmbeddingProvider;
pub use language_model::ILanguageModel;
pub use query_logger::IQueryLogger;
pub use relevance::IRelevanceModel;
pub use retrieval_backend::IRetrievalBackend;
