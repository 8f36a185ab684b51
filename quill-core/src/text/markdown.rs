//! Markdown-like heading parsing.

/// One section parsed from a text dump: heading text, body, and nested
/// subsections in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDraft {
    pub name: String,
    pub content: String,
    pub children: Vec<SectionDraft>,
}

impl SectionDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// `Some((level, title))` when `line` is an ATX heading (`## Title` →
/// `(2, "Title")`). The opening `#` run must be followed by whitespace or the
/// end of the line, so `#1 cause` is body text. A closing `#` run is dropped
/// only when whitespace precedes it, so `C#` keeps its suffix.
pub fn heading_level(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_start();
    let level = line.chars().take_while(|c| *c == '#').count();
    let rest = &line[level..];
    if level == 0 || !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    let title = rest.trim();
    let unclosed = title.trim_end_matches('#');
    if unclosed.is_empty() || unclosed.ends_with(char::is_whitespace) {
        return Some((level, unclosed.trim_end()));
    }
    Some((level, title))
}

/// Parse a text dump into a section forest. Body lines (blank ones included)
/// belong to the closest preceding heading and are trimmed as a block; text
/// before the first heading is dropped. A heading closes every open section
/// at its own level or deeper.
pub fn parse_sections(text: &str) -> Vec<SectionDraft> {
    parse_document(text).1
}

/// Like [`parse_sections`], but also returns the trimmed text before the
/// first heading.
pub fn parse_document(text: &str) -> (String, Vec<SectionDraft>) {
    let mut preamble = String::new();
    // Stack of (level, section) still open; finished sections are attached to
    // their parent when popped.
    let mut roots: Vec<SectionDraft> = Vec::new();
    let mut open: Vec<(usize, SectionDraft)> = Vec::new();

    fn close(open: &mut Vec<(usize, SectionDraft)>, roots: &mut Vec<SectionDraft>) {
        if let Some((_, mut done)) = open.pop() {
            done.content = done.content.trim().to_string();
            match open.last_mut() {
                Some((_, parent)) => parent.children.push(done),
                None => roots.push(done),
            }
        }
    }

    for line in text.lines() {
        match heading_level(line) {
            Some((level, title)) => {
                while open.last().is_some_and(|(l, _)| *l >= level) {
                    close(&mut open, &mut roots);
                }
                open.push((level, SectionDraft::new(title)));
            }
            None => {
                let target = match open.last_mut() {
                    Some((_, current)) => &mut current.content,
                    None => &mut preamble,
                };
                target.push_str(line);
                target.push('\n');
            }
        }
    }
    while !open.is_empty() {
        close(&mut open, &mut roots);
    }

    (preamble.trim().to_string(), roots)
}
