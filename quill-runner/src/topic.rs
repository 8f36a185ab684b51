//! Topic resolution from the run's topic and free-text inputs.

use quill_core::constants::TEXT_INPUT_WORD_LIMIT;
use quill_core::errors::{QuillError, QuillResult};
use quill_core::models::{CallKind, LmRequest};
use quill_core::text::limit_word_count_preserve_newline;
use quill_core::traits::ILanguageModel;
use tracing::{info, warn};

const IMPROVE_INSTRUCTIONS: &str = "You are given a topic for a Wikipedia-style article and possibly some source \
text. Reply with a concise, specific topic name suited as the article's title. Reply with the topic only.";

const DERIVE_INSTRUCTIONS: &str = "Read the source text and name the topic it is about, as a concise title \
suited to a Wikipedia-style article. Reply with the topic only.";

/// Words kept when a topic has to be cut from the text itself.
const FALLBACK_TOPIC_WORDS: usize = 12;

/// Resolve the topic to research.
///
/// A given topic is used as is, or rewritten by the model when `improve` is
/// set. Without a topic one is derived from `text`. Neither present is
/// [`QuillError::EmptyInput`]. Failed calls fall back to the given topic, or
/// to the opening words of `text`.
pub fn resolve_topic(
    model: &dyn ILanguageModel,
    topic: Option<&str>,
    text: Option<&str>,
    improve: bool,
) -> QuillResult<String> {
    let topic = topic.map(str::trim).filter(|t| !t.is_empty());
    let text = text.map(str::trim).filter(|t| !t.is_empty());

    match (topic, text) {
        (None, None) => Err(QuillError::EmptyInput),
        (Some(topic), _) if !improve => Ok(topic.to_string()),
        (Some(topic), text) => {
            let mut request =
                LmRequest::new(CallKind::TopicImprovement, IMPROVE_INSTRUCTIONS, "Improved topic")
                    .field("Topic", topic);
            if let Some(text) = text {
                request = request.field("Source text", source_text(text));
            }
            Ok(ask(model, &request).unwrap_or_else(|| topic.to_string()))
        }
        (None, Some(text)) => {
            let request = LmRequest::new(CallKind::TopicImprovement, DERIVE_INSTRUCTIONS, "Topic")
                .field("Source text", source_text(text));
            Ok(ask(model, &request).unwrap_or_else(|| fallback_topic(text)))
        }
    }
}

fn source_text(text: &str) -> String {
    limit_word_count_preserve_newline(text, TEXT_INPUT_WORD_LIMIT)
}

fn ask(model: &dyn ILanguageModel, request: &LmRequest) -> Option<String> {
    match model.generate(request) {
        Ok(output) => {
            let topic = first_line(&request.strip_output_label(&output));
            if topic.is_empty() {
                warn!("topic call returned nothing");
                None
            } else {
                info!(topic = %topic, "topic resolved by model");
                Some(topic)
            }
        }
        Err(e) => {
            warn!(error = %e, "topic call failed");
            None
        }
    }
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(|l| l.trim().trim_start_matches('#').trim().trim_matches('"').trim())
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Opening words of the first non-empty line.
fn fallback_topic(text: &str) -> String {
    first_line(text)
        .split_whitespace()
        .take(FALLBACK_TOPIC_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_strips_markup() {
        assert_eq!(first_line("\n# \"Coral reefs\"\nmore"), "Coral reefs");
    }

    #[test]
    fn fallback_takes_opening_words() {
        let text = "\n## One two three four five six seven eight nine ten eleven twelve thirteen\nrest";
        assert_eq!(
            fallback_topic(text),
            "One two three four five six seven eight nine ten eleven twelve"
        );
    }
}
