use std::io;
use thiserror::Error;

/// Errors surfaced by an embedding provider.
#[derive(Debug, Error)]
pub enum SemanticError {
    /// The ONNX model could not be located locally and no fallback URL was provided.
    #[error("model file not found: {0}")]
    ModelNotFound(String),
    /// The tokenizer JSON is missing and there was no remote URL to fetch it from.
    #[error("tokenizer missing: {0}")]
    TokenizerMissing(String),
    /// Configuration is inconsistent (unknown mode, zero dimension, ...).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// Unable to download remote assets.
    #[error("download failed: {0}")]
    Download(String),
    /// Low-level IO failures while touching the filesystem.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// ONNX Runtime or tokenizer failures.
    #[error("inference failure: {0}")]
    Inference(String),
    /// The model produced vectors of a size other than the configured dimension.
    #[error("model produced {actual}-dimensional vectors, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl SemanticError {
    /// Assets that are absent with no URL to fetch them from; the stub provider can stand in.
    ///
    /// A failed download is not included: the operator asked for a real model.
    pub fn is_missing_asset(&self) -> bool {
        matches!(
            self,
            SemanticError::ModelNotFound(_) | SemanticError::TokenizerMissing(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = SemanticError::ModelNotFound("/path/to/model.onnx".into());
        assert!(err.to_string().contains("model file not found"));
        assert!(err.to_string().contains("/path/to/model.onnx"));

        let err = SemanticError::Inference("session failed".into());
        assert_eq!(err.to_string(), "inference failure: session failed");

        let err = SemanticError::DimensionMismatch {
            expected: 384,
            actual: 312,
        };
        assert_eq!(
            err.to_string(),
            "model produced 312-dimensional vectors, expected 384"
        );
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: SemanticError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn missing_asset_classification() {
        assert!(SemanticError::ModelNotFound("a".into()).is_missing_asset());
        assert!(SemanticError::TokenizerMissing("b".into()).is_missing_asset());
        assert!(!SemanticError::Download("c".into()).is_missing_asset());
        assert!(!SemanticError::InvalidConfig("d".into()).is_missing_asset());
        assert!(!SemanticError::Inference("e".into()).is_missing_asset());
    }
}
