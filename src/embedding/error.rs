use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("sentence encoder files missing under {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load sentence encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("encoder forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to embed product description: {source}")]
    Product {
        #[source]
        source: Box<EmbeddingError>,
    },

    #[error("failed to embed context of '{candidate}': {source}")]
    Context {
        candidate: String,
        #[source]
        source: Box<EmbeddingError>,
    },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
