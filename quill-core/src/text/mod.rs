//! Text processing shared by the curation, outline and article stages.

pub mod citations;
pub mod markdown;
pub mod sentences;
pub mod words;

pub use citations::{
    normalize_citation_groups, parse_citation_indices, remap_citations, remove_citations,
    strip_citations_above,
};
pub use markdown::{heading_level, parse_document, parse_sections, SectionDraft};
pub use sentences::{
    clean_up_section, remove_uncompleted_sentences_with_citations, trim_trailing_fragment,
};
pub use words::{limit_word_count_preserve_newline, word_count};
