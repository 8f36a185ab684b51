//! Score-ordered outline reassembly.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use quill_core::models::{HeadingRating, OutlineRatings};
use quill_core::text::heading_level;

struct SecondLevel {
    title: String,
    lines: Vec<String>,
}

struct FirstLevel {
    title: String,
    heading: String,
    /// Lines between the level-1 heading and its first level-2 child.
    preamble: Vec<String>,
    children: Vec<SecondLevel>,
}

/// Reorder level-1 sections by descending rating, and the level-2
/// subsections of each level-1 section by their own ratings when present.
///
/// Sorting is stable; unrated sections follow the rated ones in their
/// original order. Lines before the first level-1 heading stay on top.
pub fn reorder_outline(outline: &str, ratings: &OutlineRatings) -> String {
    let (leading, mut sections) = split_first_level(outline);

    sections.sort_by(|a, b| {
        by_score(ratings.first_level.get(&a.title), ratings.first_level.get(&b.title))
    });
    for section in &mut sections {
        if let Some(child_ratings) = ratings.second_level.get(&section.title) {
            sort_children(&mut section.children, child_ratings);
        }
    }

    let mut out = leading;
    for section in sections {
        out.push(section.heading);
        out.extend(section.preamble);
        for child in section.children {
            out.extend(child.lines);
        }
    }
    out.join("\n")
}

fn sort_children(children: &mut [SecondLevel], ratings: &BTreeMap<String, HeadingRating>) {
    children.sort_by(|a, b| by_score(ratings.get(&a.title), ratings.get(&b.title)));
}

fn by_score(a: Option<&HeadingRating>, b: Option<&HeadingRating>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b
            .weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn split_first_level(outline: &str) -> (Vec<String>, Vec<FirstLevel>) {
    let mut leading = Vec::new();
    let mut sections: Vec<FirstLevel> = Vec::new();

    for line in outline.lines() {
        match heading_level(line) {
            Some((1, title)) => sections.push(FirstLevel {
                title: title.to_string(),
                heading: line.to_string(),
                preamble: Vec::new(),
                children: Vec::new(),
            }),
            Some((2, title)) if !sections.is_empty() => {
                if let Some(section) = sections.last_mut() {
                    section.children.push(SecondLevel {
                        title: title.to_string(),
                        lines: vec![line.to_string()],
                    });
                }
            }
            _ => match sections.last_mut() {
                Some(section) => match section.children.last_mut() {
                    Some(child) => child.lines.push(line.to_string()),
                    None => section.preamble.push(line.to_string()),
                },
                None => leading.push(line.to_string()),
            },
        }
    }
    (leading, sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(score: f64) -> HeadingRating {
        HeadingRating {
            weighted_score: score,
            justification: String::new(),
        }
    }

    #[test]
    fn first_level_sorted_descending_with_unrated_last() {
        let outline = "# History\n## Early\n# Threats\n## Bleaching\n# Trivia\n# Economy";
        let ratings = OutlineRatings {
            first_level: BTreeMap::from([
                ("History".to_string(), rating(0.4)),
                ("Threats".to_string(), rating(0.9)),
                ("Economy".to_string(), rating(0.6)),
            ]),
            ..OutlineRatings::default()
        };
        assert_eq!(
            reorder_outline(outline, &ratings),
            "# Threats\n## Bleaching\n# Economy\n# History\n## Early\n# Trivia"
        );
    }

    #[test]
    fn second_level_sorted_and_preamble_kept() {
        let outline = "# Threats\nIntro line\n## Bleaching\n### Events\n## Overfishing";
        let ratings = OutlineRatings {
            second_level: BTreeMap::from([(
                "Threats".to_string(),
                BTreeMap::from([
                    ("Bleaching".to_string(), rating(0.6)),
                    ("Overfishing".to_string(), rating(0.8)),
                ]),
            )]),
            ..OutlineRatings::default()
        };
        assert_eq!(
            reorder_outline(outline, &ratings),
            "# Threats\nIntro line\n## Overfishing\n## Bleaching\n### Events"
        );
    }

    #[test]
    fn empty_ratings_leave_outline_unchanged() {
        let outline = "# B\n## B1\n# A";
        assert_eq!(reorder_outline(outline, &OutlineRatings::default()), outline);
    }
}
