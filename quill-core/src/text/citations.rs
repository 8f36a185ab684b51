//! `[n]` citation markers.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

static CITATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(\d+)\]").unwrap());
static CITATION_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+(?:\s*,\s*\d+)+)\]").unwrap());
static CITATION_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\[\d+\])+").unwrap());
static ANY_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+(?:\s*,\s*\d+)*\]").unwrap());

/// Citation indices in order of appearance, repeats included.
pub fn parse_citation_indices(text: &str) -> Vec<usize> {
    CITATION
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}

/// Remove every citation marker, grouped forms (`[1, 2]`) included.
pub fn remove_citations(text: &str) -> String {
    ANY_CITATION.replace_all(text, "").to_string()
}

/// Rewrite `[1, 2]` as `[1][2]`, and sort and dedupe adjacent marker runs.
pub fn normalize_citation_groups(text: &str) -> String {
    let split = CITATION_GROUP.replace_all(text, |caps: &Captures| {
        caps[1]
            .split(',')
            .map(|n| format!("[{}]", n.trim()))
            .collect::<String>()
    });
    CITATION_RUN
        .replace_all(&split, |caps: &Captures| {
            let unique: BTreeSet<usize> = parse_citation_indices(&caps[0]).into_iter().collect();
            unique.iter().map(|n| format!("[{n}]")).collect::<String>()
        })
        .to_string()
}

/// Rewrite every `[n]` through `mapping`; markers without a mapping are removed.
pub fn remap_citations(text: &str, mapping: &HashMap<usize, usize>) -> String {
    CITATION
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| mapping.get(&n))
                .map(|n| format!("[{n}]"))
                .unwrap_or_default()
        })
        .to_string()
}

/// Remove markers whose index is 0 or above `max`, returning the cleaned text
/// and the set of indices that remain.
pub fn strip_citations_above(text: &str, max: usize) -> (String, BTreeSet<usize>) {
    let mut kept = BTreeSet::new();
    let cleaned = CITATION
        .replace_all(text, |caps: &Captures| match caps[1].parse::<usize>() {
            Ok(n) if n >= 1 && n <= max => {
                kept.insert(n);
                caps[0].to_string()
            }
            _ => String::new(),
        })
        .to_string();
    (cleaned, kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_indices_in_order() {
        assert_eq!(parse_citation_indices("a [2] b [1][2] c"), vec![2, 1, 2]);
    }

    #[test]
    fn removes_plain_and_grouped_markers() {
        assert_eq!(remove_citations("x [1] y [2, 3]."), "x  y .");
    }

    #[test]
    fn normalizes_groups_and_runs() {
        assert_eq!(normalize_citation_groups("a [3, 1]."), "a [1][3].");
        assert_eq!(normalize_citation_groups("a [2][1][2]."), "a [1][2].");
    }

    #[test]
    fn remap_drops_unmapped_markers() {
        let mapping: HashMap<usize, usize> = [(1, 5), (2, 1)].into_iter().collect();
        assert_eq!(remap_citations("a [1] b [2] c [9]", &mapping), "a [5] b [1] c ");
    }

    #[test]
    fn remap_is_simultaneous_not_sequential() {
        let mapping: HashMap<usize, usize> = [(1, 2), (2, 1)].into_iter().collect();
        assert_eq!(remap_citations("[1][2]", &mapping), "[2][1]");
    }

    #[test]
    fn strips_markers_beyond_available_evidence() {
        let (text, kept) = strip_citations_above("Finding [1][3].", 2);
        assert_eq!(text, "Finding [1].");
        assert_eq!(kept.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn strips_zero_marker() {
        let (text, kept) = strip_citations_above("a [0] b [1]", 1);
        assert_eq!(text, "a  b [1]");
        assert!(kept.contains(&1));
    }
}
