//! Conditional request handling: entity tags, request preconditions and
//! the evaluator deciding between proceeding, 304 and 412.

pub mod etag;
pub mod evaluator;

pub use etag::{EntityTag, EntityTagList};
pub use evaluator::{ConditionalContext, ConditionalEvaluator, Decision, Preconditions};
