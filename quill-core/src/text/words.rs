/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most `max_words` words, preserving line breaks between lines.
/// Runs of spaces inside a line collapse to one space; blank lines are dropped.
pub fn limit_word_count_preserve_newline(input: &str, max_words: usize) -> String {
    let mut kept = 0usize;
    let mut lines: Vec<String> = Vec::new();

    for line in input.lines() {
        if kept >= max_words {
            break;
        }
        let words: Vec<&str> = line
            .split_whitespace()
            .take(max_words - kept)
            .collect();
        kept += words.len();
        if !words.is_empty() {
            lines.push(words.join(" "));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_text_intact() {
        assert_eq!(limit_word_count_preserve_newline("a b\nc", 10), "a b\nc");
    }

    #[test]
    fn cuts_in_the_middle_of_a_line() {
        assert_eq!(limit_word_count_preserve_newline("a b c\nd e", 2), "a b");
        assert_eq!(limit_word_count_preserve_newline("a b c\nd e", 4), "a b c\nd");
    }

    #[test]
    fn zero_limit_is_empty() {
        assert_eq!(limit_word_count_preserve_newline("a b", 0), "");
    }

    #[test]
    fn counts_words() {
        assert_eq!(word_count("  one two\nthree "), 3);
    }
}
