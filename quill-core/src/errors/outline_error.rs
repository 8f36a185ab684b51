/// Outline rating errors. Always degraded to "use the outline unmodified".
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("malformed rating response: {reason}")]
    MalformedRating { reason: String },

    #[error("rating failed after {attempts} attempts: {reason}")]
    RatingExhausted { attempts: u32, reason: String },
}
