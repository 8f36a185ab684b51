//! OpenAI-compatible chat completions (OpenAI and Azure OpenAI).

use quill_core::config::ModelSpec;
use quill_core::errors::{LanguageModelError, QuillResult};
use quill_core::models::LmRequest;
use quill_core::traits::ILanguageModel;
use serde::{Deserialize, Serialize};

use super::http;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const AZURE_API_VERSION: &str = "2024-02-01";

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    OpenAi,
    Azure,
}

pub struct OpenAiCompatible {
    spec: ModelSpec,
    api_key: String,
    url: String,
    flavor: Flavor,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatible {
    pub fn openai(spec: ModelSpec, api_key: String) -> QuillResult<Self> {
        let base = spec
            .endpoint
            .clone()
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string());
        let url = format!("{}/chat/completions", base.trim_end_matches('/'));
        let client = http::build_client(spec.timeout_secs, &spec.model)?;
        Ok(Self {
            spec,
            api_key,
            url,
            flavor: Flavor::OpenAi,
            client,
        })
    }

    /// Azure addresses the model as a deployment under the resource endpoint.
    pub fn azure(spec: ModelSpec, api_key: String) -> QuillResult<Self> {
        let base = spec.endpoint.clone().ok_or_else(|| LanguageModelError::RequestFailed {
            model: spec.model.clone(),
            reason: "azure provider needs an endpoint".to_string(),
        })?;
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={AZURE_API_VERSION}",
            base.trim_end_matches('/'),
            spec.model
        );
        let client = http::build_client(spec.timeout_secs, &spec.model)?;
        Ok(Self {
            spec,
            api_key,
            url,
            flavor: Flavor::Azure,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ILanguageModel for OpenAiCompatible {
    fn generate(&self, request: &LmRequest) -> QuillResult<String> {
        let prompt = request.render_prompt();
        let body = ChatRequest {
            model: (self.flavor == Flavor::OpenAi).then_some(self.spec.model.as_str()),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: request.max_tokens.unwrap_or(self.spec.max_tokens),
            temperature: self.spec.temperature,
            top_p: self.spec.top_p,
        };

        let bearer;
        let headers: Vec<(&str, &str)> = match self.flavor {
            Flavor::OpenAi => {
                bearer = format!("Bearer {}", self.api_key);
                vec![("Authorization", bearer.as_str())]
            }
            Flavor::Azure => vec![("api-key", self.api_key.as_str())],
        };

        let response: ChatResponse = http::post_json(
            &self.client,
            &self.url,
            &headers,
            &body,
            self.spec.max_retries,
            &self.spec.model,
        )?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        let content = request.strip_output_label(&content);
        if content.is_empty() {
            return Err(LanguageModelError::EmptyCompletion {
                model: self.spec.model.clone(),
            }
            .into());
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.spec.model
    }
}
