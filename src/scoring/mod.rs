//! Per-candidate raw signals.
//!
//! - [`SemanticScorer`]: cosine similarity of the product and candidate context embeddings.
//! - [`PolicyScorer`]: externally judged tolerance for promotional posts, via a
//!   [`CompletionProvider`]. Unusable replies become [`PolicyVerdict::Fallback`].
//! - [`activity_score`]: log-scaled median upvotes of recent items.
//!
//! Raw signals are only comparable within one batch; see [`crate::ranking`].

pub mod activity;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod policy;
pub mod semantic;
pub mod types;


pub use activity::{activity_score, median};
pub use error::PolicyError;
#[cfg(any(test, feature = "mock"))]
pub use mock::ScriptedCompletionProvider;
pub use policy::{
    CompletionProvider, GenaiCompletionProvider, NeutralCompletionProvider, POLICY_RUBRIC,
    PolicyPrompt, PolicyScorer, interpret_reply, parse_tolerance,
};
pub use semantic::SemanticScorer;
pub use types::{PolicyVerdict, RawSignals};
