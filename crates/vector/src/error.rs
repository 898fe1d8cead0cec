use thiserror::Error;

/// Errors raised while decoding or comparing embedding vectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    /// The transport string is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(String),
    /// Decoded byte length is not a whole number of `f32` values.
    #[error("byte length {0} is not a multiple of 4")]
    InvalidLength(usize),
    /// Two vectors that must be compared have different dimensions.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

impl From<base64::DecodeError> for VectorError {
    fn from(err: base64::DecodeError) -> Self {
        VectorError::Base64(err.to_string())
    }
}
