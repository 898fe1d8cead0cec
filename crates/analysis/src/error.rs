use semantic::SemanticError;
use thiserror::Error;
use vector::VectorError;

/// Request-level failures of an analyzer.
///
/// Problems with a single article, author or department never show up here; those
/// are recorded as skipped items in the [`BatchReport`](crate::BatchReport).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] SemanticError),
    #[error("vector error: {0}")]
    Vector(#[from] VectorError),
    #[error("invalid analysis config: {0}")]
    InvalidConfig(String),
}
