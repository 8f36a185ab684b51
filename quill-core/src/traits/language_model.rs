use crate::errors::QuillResult;
use crate::models::LmRequest;

/// Structured text-generation model.
pub trait ILanguageModel: Send + Sync {
    /// Run one call and return the raw completion for the request's output field.
    fn generate(&self, request: &LmRequest) -> QuillResult<String>;

    fn model_name(&self) -> &str;
}
