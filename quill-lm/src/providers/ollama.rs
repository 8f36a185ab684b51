//! Local models served by Ollama's chat endpoint.

use quill_core::config::ModelSpec;
use quill_core::errors::{LanguageModelError, QuillResult};
use quill_core::models::LmRequest;
use quill_core::traits::ILanguageModel;
use serde::{Deserialize, Serialize};

use super::http;
use super::openai::ChatMessage;

const OLLAMA_BASE_URL: &str = "http://localhost:11434";

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

pub struct OllamaModel {
    spec: ModelSpec,
    url: String,
    client: reqwest::blocking::Client,
}

impl OllamaModel {
    pub fn new(spec: ModelSpec) -> QuillResult<Self> {
        let base = spec
            .endpoint
            .clone()
            .unwrap_or_else(|| OLLAMA_BASE_URL.to_string());
        let url = format!("{}/api/chat", base.trim_end_matches('/'));
        let client = http::build_client(spec.timeout_secs, &spec.model)?;
        Ok(Self { spec, url, client })
    }
}

impl ILanguageModel for OllamaModel {
    fn generate(&self, request: &LmRequest) -> QuillResult<String> {
        let prompt = request.render_prompt();
        let body = OllamaChatRequest {
            model: &self.spec.model,
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
            stream: false,
            options: OllamaOptions {
                temperature: self.spec.temperature,
                top_p: self.spec.top_p,
                num_predict: request.max_tokens.unwrap_or(self.spec.max_tokens),
            },
        };

        let response: OllamaChatResponse = http::post_json(
            &self.client,
            &self.url,
            &[],
            &body,
            self.spec.max_retries,
            &self.spec.model,
        )?;

        let content = request.strip_output_label(&response.message.content);
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
