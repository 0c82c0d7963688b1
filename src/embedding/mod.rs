//! Text embedding for semantic scoring.
//!
//! - [`sentence`] provides the sentence encoder (or its deterministic stub).
//! - [`similarity`] compares embeddings.

/// BERT encoder wrapper used by the sentence embedder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder (model or stub).
pub mod sentence;
/// Vector similarity helpers.
pub mod similarity;
/// Tokenizer loading helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use sentence::{EmbedderConfig, SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceEmbedder};
pub use similarity::cosine_similarity;

/// Maps text to a fixed-dimension vector.
///
/// Implementations must be deterministic for a fixed model so semantic scores are
/// reproducible across runs.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn embedding_dim(&self) -> usize;
}
