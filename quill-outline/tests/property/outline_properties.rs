//! Property tests for heading normalization and reassembly.

use std::collections::BTreeMap;

use proptest::prelude::*;
use quill_core::models::{HeadingRating, OutlineRatings};
use quill_core::text::heading_level;
use quill_outline::{normalize_heading_levels, reorder_outline};

fn outline_strategy() -> impl Strategy<Value = (usize, Vec<(usize, String)>)> {
    (
        1usize..4,
        prop::collection::vec((0usize..3, "[A-Za-z]{1,8}"), 1..12),
    )
}

fn render(offset: usize, lines: &[(usize, String)]) -> String {
    lines
        .iter()
        .map(|(depth, title)| format!("{} {}", "#".repeat(depth + offset), title))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Normalization: minimum depth becomes 1, relative nesting preserved
// =============================================================================

proptest! {
    #[test]
    fn normalized_minimum_depth_is_one((offset, lines) in outline_strategy()) {
        let normalized = normalize_heading_levels(&render(offset, &lines));
        let levels: Vec<usize> =
            normalized.lines().filter_map(heading_level).map(|(l, _)| l).collect();
        prop_assert_eq!(levels.iter().copied().min(), Some(1));

        let min_depth = lines.iter().map(|(d, _)| *d).min().unwrap_or(0);
        let expected: Vec<usize> = lines.iter().map(|(d, _)| d - min_depth + 1).collect();
        prop_assert_eq!(levels, expected);
    }

    #[test]
    fn normalization_is_idempotent((offset, lines) in outline_strategy()) {
        let once = normalize_heading_levels(&render(offset, &lines));
        prop_assert_eq!(normalize_heading_levels(&once), once.clone());
    }
}

// =============================================================================
// Reassembly: lines are permuted, never lost
// =============================================================================

proptest! {
    #[test]
    fn reorder_keeps_every_line(
        (_, lines) in outline_strategy(),
        scores in prop::collection::vec(0.0f64..1.0, 12),
    ) {
        let outline = normalize_heading_levels(&render(1, &lines));
        let first_level: BTreeMap<String, HeadingRating> = outline
            .lines()
            .filter_map(heading_level)
            .filter(|(l, _)| *l == 1)
            .zip(scores.iter())
            .map(|((_, t), s)| {
                let rating = HeadingRating { weighted_score: *s, justification: String::new() };
                (t.to_string(), rating)
            })
            .collect();
        let ratings = OutlineRatings { first_level, ..OutlineRatings::default() };

        let reordered = reorder_outline(&outline, &ratings);
        let mut before: Vec<&str> = outline.lines().collect();
        let mut after: Vec<&str> = reordered.lines().collect();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }
}
