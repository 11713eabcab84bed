use crate::common::*;
use thiserror::Error;

/// Failures raised by the sampling, decoding and collation stages.
#[derive(Debug, Error)]
pub enum SeqError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("the input sequence has no frames")]
    EmptySequence,

    #[error("failed to decode '{}': {}", .path.display(), .reason)]
    Decode { path: PathBuf, reason: String },

    #[error("item {index} has shape {found:?}, but {expected:?} is expected")]
    ShapeMismatch {
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("index {index} is out of range for a dataset of {len} records")]
    InvalidIndex { index: usize, len: usize },
}

impl SeqError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
