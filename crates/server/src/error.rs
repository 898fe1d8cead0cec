use analysis::AnalysisError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use semantic::SemanticError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid embedding: {0}")]
    Decode(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Model error: {0}")]
    Model(#[from] SemanticError),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MissingField(_) | ServerError::BadRequest(_) | ServerError::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Model(_) | ServerError::Analysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::MissingField(_) => "MISSING_FIELD",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Decode(_) => "DECODE_ERROR",
            ServerError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ServerError::Model(_) => "MODEL_ERROR",
            ServerError::Analysis(_) => "ANALYSIS_ERROR",
            ServerError::Timeout => "REQUEST_TIMEOUT",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, code = self.error_code(), "request rejected");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => {
                if let Some(field) = missing_field_name(&message) {
                    ServerError::MissingField(field)
                } else if is_embedding_decode_failure(&message) {
                    ServerError::Decode(message)
                } else {
                    ServerError::BadRequest(message)
                }
            }
            JsonRejection::BytesRejection(_)
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
            {
                ServerError::PayloadTooLarge
            }
            _ => ServerError::BadRequest(message),
        }
    }
}

/// Pulls `x` out of serde's "missing field `x`" message.
fn missing_field_name(message: &str) -> Option<String> {
    let rest = message.split("missing field `").nth(1)?;
    let name = rest.split('`').next()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Fixed parts of the `VectorError` messages raised while decoding an embedding.
const DECODE_MARKERS: [&str; 2] = ["invalid base64 payload", "is not a multiple of 4"];

fn is_embedding_decode_failure(message: &str) -> bool {
    DECODE_MARKERS.iter().any(|marker| message.contains(marker))
}

impl From<AnalysisError> for ServerError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Embedding(err) => ServerError::Model(err),
            other => ServerError::Analysis(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("analysis task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vector::VectorError;

    #[test]
    fn status_and_code_table() {
        let cases = [
            (ServerError::MissingField("topic".into()), 400, "MISSING_FIELD"),
            (ServerError::BadRequest("x".into()), 400, "BAD_REQUEST"),
            (ServerError::Decode("x".into()), 400, "DECODE_ERROR"),
            (
                ServerError::Model(SemanticError::Inference("x".into())),
                422,
                "MODEL_ERROR",
            ),
            (ServerError::Analysis("x".into()), 422, "ANALYSIS_ERROR"),
            (ServerError::Timeout, 408, "REQUEST_TIMEOUT"),
            (ServerError::NotFound, 404, "NOT_FOUND"),
            (ServerError::Internal("x".into()), 500, "INTERNAL_ERROR"),
            (ServerError::Config("x".into()), 500, "CONFIG_ERROR"),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{err}");
            assert_eq!(err.error_code(), code);
        }
    }

    #[test]
    fn missing_field_is_extracted_from_serde_message() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `user_query` at line 1 column 2";
        assert_eq!(missing_field_name(msg), Some("user_query".into()));
        assert_eq!(missing_field_name("invalid type: string"), None);
        assert_eq!(missing_field_name("missing field ``"), None);
    }

    #[test]
    fn embedding_decode_failures_are_recognized() {
        assert!(is_embedding_decode_failure(
            "query_vector: invalid base64 payload: Invalid symbol 37, offset 0. at line 1 column 20"
        ));
        assert!(is_embedding_decode_failure(
            "byte length 3 is not a multiple of 4 at line 1 column 9"
        ));
        assert!(!is_embedding_decode_failure("invalid type: integer `5`, expected a string"));
        assert!(is_embedding_decode_failure(&VectorError::InvalidLength(7).to_string()));
        assert!(is_embedding_decode_failure(&VectorError::Base64("x".into()).to_string()));
    }

    #[test]
    fn analysis_errors_map_by_kind() {
        let err: ServerError = AnalysisError::Embedding(SemanticError::Inference("x".into())).into();
        assert_eq!(err.error_code(), "MODEL_ERROR");

        let err: ServerError = AnalysisError::Vector(VectorError::DimensionMismatch {
            left: 2,
            right: 3,
        })
        .into();
        assert_eq!(err.error_code(), "ANALYSIS_ERROR");
    }
}
