//! Sentence-level cleanup of generated prose.

use std::sync::LazyLock;

use regex::Regex;

use super::citations::normalize_citation_groups;
use super::markdown::heading_level;

/// Terminal punctuation optionally followed by a run of citation markers.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s*(?:\[\d+\])*").unwrap());

const CLOSING_OPENERS: &[&str] = &["Overall", "In summary", "In conclusion"];
const CLOSING_HEADINGS: &[&str] = &["# Summary", "# Conclusion"];

/// Cut everything after the last terminal punctuation mark, keeping citation
/// markers attached to it. Text without any terminal punctuation is returned
/// trimmed but otherwise unchanged.
pub fn trim_trailing_fragment(text: &str) -> String {
    match SENTENCE_END.find_iter(text).last() {
        Some(m) => text[..m.end()].trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Normalize citation groups (`[1, 2]` → `[1][2]`) and drop a trailing
/// incomplete sentence.
pub fn remove_uncompleted_sentences_with_citations(text: &str) -> String {
    trim_trailing_fragment(&normalize_citation_groups(text))
}

/// Clean one generated section: drop empty lines, trim every prose paragraph
/// to complete sentences, drop wrap-up paragraphs ("Overall", "In summary",
/// "In conclusion") and any "# Summary"/"# Conclusion" block up to the next
/// heading. Paragraphs are joined with blank lines.
pub fn clean_up_section(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_closing_block = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let is_heading = heading_level(line).is_some();

        if in_closing_block {
            if is_heading {
                in_closing_block = false;
            } else {
                continue;
            }
        }
        if CLOSING_HEADINGS.iter().any(|h| line.contains(h)) {
            in_closing_block = true;
            continue;
        }
        if CLOSING_OPENERS.iter().any(|o| line.starts_with(o)) {
            continue;
        }

        let paragraph = if is_heading {
            line.to_string()
        } else {
            remove_uncompleted_sentences_with_citations(line)
        };
        if !paragraph.is_empty() {
            out.push(paragraph);
        }
    }

    out.join("\n\n")
}
