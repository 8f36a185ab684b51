/// Language-model call errors.
#[derive(Debug, thiserror::Error)]
pub enum LanguageModelError {
    #[error("request to {model} failed: {reason}")]
    RequestFailed { model: String, reason: String },

    #[error("{model} returned status {status}: {body}")]
    BadStatus {
        model: String,
        status: u16,
        body: String,
    },

    #[error("{model} returned an empty completion")]
    EmptyCompletion { model: String },

    #[error("missing api key for provider {provider}")]
    MissingApiKey { provider: String },
}
