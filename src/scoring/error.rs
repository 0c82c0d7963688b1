use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("completion provider failed for '{candidate}': {reason}")]
    Provider { candidate: String, reason: String },

    #[error("completion reply was empty")]
    EmptyReply,

    #[error("completion reply is not a JSON object: {reason}")]
    MalformedReply { reason: String },

    #[error("completion reply has no usable 'tolerance_score'")]
    MissingScore,

    #[error("tolerance score is not finite: {value}")]
    NonFiniteScore { value: f64 },
}
