//! Provider registry.

mod http;
pub mod ollama;
pub mod openai;

pub use ollama::OllamaModel;
pub use openai::OpenAiCompatible;

use std::sync::Arc;

use quill_core::config::ModelSpec;
use quill_core::errors::{LanguageModelError, QuillResult};
use quill_core::traits::ILanguageModel;
use tracing::info;

/// Language-model provider variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LmProvider {
    OpenAi,
    Azure,
    Ollama,
}

impl LmProvider {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "azure" | "azure-openai" => Some(Self::Azure),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    fn default_key_env(&self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Azure => Some("AZURE_API_KEY"),
            Self::Ollama => None,
        }
    }
}

/// Build a model from its spec. The API key is read from the spec's
/// `api_key_env`, or the provider's conventional variable.
pub fn create_model(spec: &ModelSpec) -> QuillResult<Arc<dyn ILanguageModel>> {
    let provider = LmProvider::parse(&spec.provider).ok_or_else(|| {
        LanguageModelError::RequestFailed {
            model: spec.model.clone(),
            reason: format!("unknown provider {}", spec.provider),
        }
    })?;

    let key_env = spec
        .api_key_env
        .as_deref()
        .or_else(|| provider.default_key_env());
    let api_key = match key_env {
        Some(var) => Some(std::env::var(var).map_err(|_| LanguageModelError::MissingApiKey {
            provider: spec.provider.clone(),
        })?),
        None => None,
    };

    let model: Arc<dyn ILanguageModel> = match provider {
        LmProvider::OpenAi => {
            Arc::new(OpenAiCompatible::openai(spec.clone(), api_key.unwrap_or_default())?)
        }
        LmProvider::Azure => {
            Arc::new(OpenAiCompatible::azure(spec.clone(), api_key.unwrap_or_default())?)
        }
        LmProvider::Ollama => Arc::new(OllamaModel::new(spec.clone())?),
    };
    info!(provider = %spec.provider, model = %spec.model, "language model ready");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_tags() {
        assert_eq!(LmProvider::parse("OpenAI"), Some(LmProvider::OpenAi));
        assert_eq!(LmProvider::parse("azure-openai"), Some(LmProvider::Azure));
        assert_eq!(LmProvider::parse("ollama"), Some(LmProvider::Ollama));
        assert_eq!(LmProvider::parse("palm"), None);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let spec = ModelSpec {
            provider: "palm".to_string(),
            ..ModelSpec::default()
        };
        assert!(create_model(&spec).is_err());
    }

    #[test]
    fn missing_key_is_reported() {
        let spec = ModelSpec {
            provider: "openai".to_string(),
            api_key_env: Some("QUILL_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..ModelSpec::default()
        };
        assert!(matches!(
            create_model(&spec),
            Err(quill_core::QuillError::LanguageModel(LanguageModelError::MissingApiKey { .. }))
        ));
    }

    #[test]
    fn ollama_needs_no_key() {
        let spec = ModelSpec {
            provider: "ollama".to_string(),
            model: "llama3".to_string(),
            ..ModelSpec::default()
        };
        let model = create_model(&spec).unwrap();
        assert_eq!(model.model_name(), "llama3");
    }
}
