use thiserror::Error;

use crate::constants::WeightValidationError;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("invalid rank weights: {0}")]
    InvalidWeights(#[from] WeightValidationError),

    #[error("ranking task panicked: {reason}")]
    TaskPanicked { reason: String },
}
