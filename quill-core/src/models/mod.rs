mod dialogue;
mod information;
mod lm_request;
mod outline_rating;
mod query_trace;

pub use dialogue::{Conversation, DialogueTurn};
pub use information::{Information, ScoredInformation};
pub use lm_request::{CallKind, LmRequest};
pub use outline_rating::{HeadingRating, OutlineRatings};
pub use query_trace::{QueryTrace, StageHit};
