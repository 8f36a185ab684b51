//! Heading-importance rating.
//!
//! Level-1 headings are rated in one call and the level-2 headings of each
//! level-1 section in one call per section. A call must answer with a JSON
//! object keyed by the exact heading text. Malformed or failed calls are
//! retried with a fixed backoff; the caller falls back to the unmodified
//! outline when level-1 rating is exhausted.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use quill_core::config::OutlineConfig;
use quill_core::errors::{OutlineError, QuillResult};
use quill_core::models::{CallKind, HeadingRating, LmRequest, OutlineRatings};
use quill_core::traits::ILanguageModel;
use tracing::{debug, info, warn};

use crate::cleanup::{first_level_headings, normalize_heading_levels, second_level_headings};
use crate::matching::match_headings;
use crate::reassembly::reorder_outline;

/// Weighted criteria; the weights sum to 1.0.
pub const RUBRIC: &[(&str, f64)] = &[
    ("Relevance: how central the section is to the topic", 0.35),
    ("Evidence: how well the gathered sources can support it", 0.25),
    ("Reader value: how much a general reader learns from it", 0.25),
    ("Distinctiveness: how little it overlaps other sections", 0.15),
];

const RATING_INSTRUCTIONS: &str = "You are reviewing the outline of a Wikipedia-style article. Score every heading \
listed below against the rubric. Each criterion is scored between 0 and 1 and the weighted_score is the weighted sum \
of the criterion scores. Reply with a single JSON object whose keys are the exact heading texts as given, each mapping \
to {\"weighted_score\": number, \"justification\": one short sentence}. Do not add or rename headings.";

pub struct OutlineRater {
    model: Arc<dyn ILanguageModel>,
    config: OutlineConfig,
}

impl OutlineRater {
    pub fn new(model: Arc<dyn ILanguageModel>, config: OutlineConfig) -> Self {
        Self { model, config }
    }

    /// Rate `outline`. Fails only when level-1 rating is exhausted; a failed
    /// level-2 call just leaves that section's children unrated.
    pub fn rate(&self, topic: &str, outline: &str) -> QuillResult<OutlineRatings> {
        let outline = normalize_heading_levels(outline);
        let first = first_level_headings(&outline);
        if first.is_empty() {
            return Ok(OutlineRatings::default());
        }

        let rated = self.rate_headings(topic, None, &first)?;
        let mut ratings = OutlineRatings {
            first_level: match_headings(&first, &rated, self.config.fuzzy_match_threshold),
            ..OutlineRatings::default()
        };

        for parent in &first {
            let children = second_level_headings(&outline, parent);
            if children.len() < 2 {
                continue;
            }
            match self.rate_headings(topic, Some(parent), &children) {
                Ok(rated) => {
                    let matched =
                        match_headings(&children, &rated, self.config.fuzzy_match_threshold);
                    if !matched.is_empty() {
                        ratings.second_level.insert(parent.clone(), matched);
                    }
                }
                Err(e) => {
                    warn!(section = %parent, error = %e, "second-level rating failed, order kept")
                }
            }
        }
        Ok(ratings)
    }

    /// Rate and reorder. On failure the outline comes back unmodified
    /// (level-normalized) with empty ratings.
    pub fn rate_and_reorder(&self, topic: &str, outline: &str) -> (String, OutlineRatings) {
        let normalized = normalize_heading_levels(outline);
        match self.rate(topic, &normalized) {
            Ok(ratings) => {
                info!(
                    rated = ratings.first_level.len(),
                    sections_with_rated_children = ratings.second_level.len(),
                    "outline rated"
                );
                (reorder_outline(&normalized, &ratings), ratings)
            }
            Err(e) => {
                warn!(error = %e, "outline rating failed, keeping draft order");
                (normalized, OutlineRatings::default())
            }
        }
    }

    fn rate_headings(
        &self,
        topic: &str,
        parent: Option<&str>,
        headings: &[String],
    ) -> QuillResult<BTreeMap<String, HeadingRating>> {
        let rubric = RUBRIC
            .iter()
            .map(|(criterion, weight)| format!("- {criterion} (weight {weight})"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut request = LmRequest::new(CallKind::OutlineRating, RATING_INSTRUCTIONS, "Ratings")
            .field("Topic", topic)
            .field("Rubric", rubric);
        if let Some(parent) = parent {
            request = request.field("Parent section", parent);
        }
        let request = request.field("Headings", headings.join("\n"));

        let attempts = self.config.rating_max_attempts.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            let parsed = self
                .model
                .generate(&request)
                .and_then(|output| parse_ratings(&output));
            match parsed {
                Ok(rated) => {
                    debug!(attempt, headings = headings.len(), "rating parsed");
                    return Ok(rated);
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "rating attempt failed");
                    last_error = e.to_string();
                    if attempt < attempts {
                        std::thread::sleep(Duration::from_millis(self.config.rating_backoff_ms));
                    }
                }
            }
        }
        Err(OutlineError::RatingExhausted {
            attempts,
            reason: last_error,
        }
        .into())
    }
}

/// Parse the JSON object between the first `{` and the last `}`.
pub fn parse_ratings(output: &str) -> QuillResult<BTreeMap<String, HeadingRating>> {
    let (Some(start), Some(end)) = (output.find('{'), output.rfind('}')) else {
        return Err(OutlineError::MalformedRating {
            reason: "no JSON object in response".to_string(),
        }
        .into());
    };
    if end < start {
        return Err(OutlineError::MalformedRating {
            reason: "unbalanced braces".to_string(),
        }
        .into());
    }
    serde_json::from_str(&output[start..=end]).map_err(|e| {
        OutlineError::MalformedRating {
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rubric_weights_sum_to_one() {
        let total: f64 = RUBRIC.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let output = "Sure!\n{\"History\": {\"weighted_score\": 0.4, \"justification\": \"ok\"}}\nDone.";
        let rated = parse_ratings(output).unwrap();
        assert_eq!(rated["History"].weighted_score, 0.4);
    }

    #[test]
    fn missing_json_is_malformed() {
        assert!(parse_ratings("no ratings today").is_err());
        assert!(parse_ratings("} {").is_err());
        assert!(parse_ratings("{\"History\": 3}").is_err());
    }
}
