use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Importance score the rating call assigned to one heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingRating {
    pub weighted_score: f64,
    #[serde(default)]
    pub justification: String,
}

/// Ratings for one outline-generation pass, keyed by original heading text.
///
/// Persisted next to the reordered outline, never part of the final article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineRatings {
    pub first_level: BTreeMap<String, HeadingRating>,
    /// Level-1 heading → ratings of its level-2 children.
    pub second_level: BTreeMap<String, BTreeMap<String, HeadingRating>>,
}

impl OutlineRatings {
    pub fn is_empty(&self) -> bool {
        self.first_level.is_empty() && self.second_level.is_empty()
    }
}
