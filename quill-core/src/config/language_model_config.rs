use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// One language-model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    /// Provider tag: "openai", "azure", "ollama".
    pub provider: String,
    pub model: String,
    /// Base URL override; the provider default is used when `None`.
    pub endpoint: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_LM_PROVIDER.to_string(),
            model: defaults::DEFAULT_LM_MODEL.to_string(),
            endpoint: None,
            api_key_env: None,
            max_tokens: defaults::DEFAULT_LM_MAX_TOKENS,
            temperature: defaults::DEFAULT_LM_TEMPERATURE,
            top_p: defaults::DEFAULT_LM_TOP_P,
            timeout_secs: defaults::DEFAULT_LM_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_LM_MAX_RETRIES,
        }
    }
}

/// Language-model configuration: a default spec plus per-role overrides.
///
/// Role keys: "conversation", "question_asker", "outline", "article", "polish".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageModelConfig {
    pub default: ModelSpec,
    pub roles: BTreeMap<String, ModelSpec>,
}

impl LanguageModelConfig {
    /// Spec for `role`, falling back to the default spec.
    pub fn spec_for(&self, role: &str) -> &ModelSpec {
        self.roles.get(role).unwrap_or(&self.default)
    }
}
