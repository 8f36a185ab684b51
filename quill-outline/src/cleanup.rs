//! Outline text cleanup and heading-level normalization.

use std::sync::LazyLock;

use quill_core::constants::BOILERPLATE_OUTLINE_SECTIONS;
use quill_core::text::heading_level;
use regex::Regex;

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Turn a model-written outline into heading lines only.
///
/// - `- item` bullets become headings one level below the current heading.
/// - A heading naming `topic` itself discards it and everything before it.
/// - Boilerplate sections and their subsections are removed.
/// - Bracketed fragments such as `[1]` are removed.
/// - Any other line is dropped.
pub fn clean_up_outline(outline: &str, topic: &str) -> String {
    let topic = topic.trim().to_lowercase();
    let mut lines: Vec<(usize, String)> = Vec::new();
    let mut current_level = 0usize;

    for raw in outline.lines() {
        let line = BRACKETED.replace_all(raw.trim(), "");
        let line = line.trim();
        if let Some((level, title)) = heading_level(line) {
            if title.is_empty() {
                continue;
            }
            if !topic.is_empty() && title.to_lowercase() == topic {
                lines.clear();
                current_level = 0;
                continue;
            }
            current_level = level;
            lines.push((level, title.to_string()));
        } else if let Some(item) = line.strip_prefix('-') {
            let item = item.trim();
            if !item.is_empty() {
                lines.push((current_level + 1, item.to_string()));
            }
        }
    }

    let mut out: Vec<String> = Vec::new();
    let mut skip_below: Option<usize> = None;
    for (level, title) in lines {
        if let Some(cut) = skip_below {
            if level > cut {
                continue;
            }
            skip_below = None;
        }
        if BOILERPLATE_OUTLINE_SECTIONS.contains(&title.to_lowercase().as_str()) {
            skip_below = Some(level);
            continue;
        }
        out.push(format!("{} {}", "#".repeat(level), title));
    }
    out.join("\n")
}

/// Shift heading levels so the shallowest heading is level 1. Non-heading
/// lines are kept as they are.
pub fn normalize_heading_levels(outline: &str) -> String {
    let min_level = outline
        .lines()
        .filter_map(heading_level)
        .map(|(level, _)| level)
        .min();
    let Some(min_level) = min_level else {
        return outline.to_string();
    };
    if min_level <= 1 {
        return outline.to_string();
    }
    let shift = min_level - 1;
    outline
        .lines()
        .map(|line| match heading_level(line) {
            Some((level, title)) => format!("{} {}", "#".repeat(level - shift), title),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep only headings at most `max_depth` deep.
pub fn filter_heading_depth(outline: &str, max_depth: usize) -> String {
    outline
        .lines()
        .filter(|line| match heading_level(line) {
            Some((level, _)) => level <= max_depth,
            None => false,
        })
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Titles of the level-1 headings, in order.
pub fn first_level_headings(outline: &str) -> Vec<String> {
    outline
        .lines()
        .filter_map(heading_level)
        .filter(|(level, _)| *level == 1)
        .map(|(_, title)| title.to_string())
        .collect()
}

/// Titles of the level-2 headings under the level-1 heading `parent`.
pub fn second_level_headings(outline: &str, parent: &str) -> Vec<String> {
    let mut inside = false;
    let mut out = Vec::new();
    for (level, title) in outline.lines().filter_map(heading_level) {
        match level {
            1 => inside = title == parent,
            2 if inside => out.push(title.to_string()),
            _ => {}
        }
    }
    out
}
