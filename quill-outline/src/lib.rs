//! # quill-outline
//!
//! Outline drafting, heading-importance rating, rating-to-heading matching,
//! score-ordered reassembly, and dialogue-grounded refinement.

pub mod cleanup;
pub mod generator;
pub mod matching;
pub mod rater;
pub mod reassembly;
pub mod transcript;

pub use cleanup::{clean_up_outline, filter_heading_depth, normalize_heading_levels};
pub use generator::{OutlineGenerator, OutlineResult};
pub use matching::match_headings;
pub use rater::OutlineRater;
pub use reassembly::reorder_outline;
pub use transcript::format_transcript;
