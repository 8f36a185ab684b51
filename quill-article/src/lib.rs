//! # quill-article
//!
//! The article tree and its citation reference map, section-wise article
//! generation grounded in the Evidence Store, and the final polishing pass.

pub mod article;
pub mod generator;
pub mod polisher;
pub mod references;
pub mod selection;

pub use article::{Article, ArticleSection};
pub use generator::ArticleGenerator;
pub use polisher::ArticlePolisher;
pub use references::ReferenceMap;
pub use selection::{select_sections, SectionTask};
