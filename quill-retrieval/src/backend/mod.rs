//! Retrieval Backend Adapter implementations.

pub mod exa;
pub mod in_memory;

pub use exa::ExaBackend;
pub use in_memory::InMemoryBackend;

use quill_core::config::RetrievalConfig;
use quill_core::errors::{QuillResult, RetrievalError};
use quill_core::traits::IRetrievalBackend;
use quill_core::Information;
use tracing::info;

/// Search backend variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Exa,
    InMemory,
}

impl BackendKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "exa" => Some(Self::Exa),
            "in-memory" | "memory" | "local" => Some(Self::InMemory),
            _ => None,
        }
    }
}

/// Build the configured backend. `corpus` seeds the in-memory backend and is
/// ignored by the others.
pub fn create_backend(
    config: &RetrievalConfig,
    corpus: Vec<Information>,
) -> QuillResult<Box<dyn IRetrievalBackend>> {
    let kind = BackendKind::parse(&config.backend).ok_or_else(|| RetrievalError::UnknownBackend {
        name: config.backend.clone(),
    })?;
    let backend: Box<dyn IRetrievalBackend> = match kind {
        BackendKind::Exa => Box::new(ExaBackend::from_env(&config.backend_api_key_env)?),
        BackendKind::InMemory => Box::new(InMemoryBackend::new(corpus)),
    };
    info!(backend = backend.name(), "retrieval backend ready");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::errors::QuillError;

    #[test]
    fn unknown_backend_is_an_error() {
        let config = RetrievalConfig {
            backend: "altavista".to_string(),
            ..RetrievalConfig::default()
        };
        assert!(matches!(
            create_backend(&config, Vec::new()),
            Err(QuillError::Retrieval(RetrievalError::UnknownBackend { .. }))
        ));
    }

    #[test]
    fn in_memory_backend_is_built_from_corpus() {
        let config = RetrievalConfig {
            backend: "in-memory".to_string(),
            ..RetrievalConfig::default()
        };
        let backend = create_backend(&config, Vec::new()).unwrap();
        assert_eq!(backend.name(), "in-memory");
    }
}
