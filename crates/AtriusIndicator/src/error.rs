//! Error types for the indicator CLI and server surfaces.
//!
//! The core stages keep their own precise outcome types
//! ([`Violation`], [`DescriptionError`], [`ExplodeError`],
//! [`EvaluationError`]); this module wraps them into a single error for
//! the executables, with HTTP status mapping for the server.

use atrius_indicator_support::{DescriptionError, EvaluationError, ExplodeError, Violation};
use std::fmt;

/// Result type alias for CLI and server operations.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Error type for the indicator executables.
#[derive(Debug)]
pub enum ExpressionError {
    /// A formula failed validation.
    Validation(Violation),
    /// Description rendering hit an unresolved reference.
    Description(DescriptionError),
    /// Total expansion failed.
    Explode(ExplodeError),
    /// The arithmetic evaluator rejected generated text.
    Evaluation(EvaluationError),
    /// Invalid request or command-line input.
    InvalidInput(String),
    /// IO error (snapshot/context files, output).
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::Validation(violation) => write!(f, "Validation failed: {}", violation),
            ExpressionError::Description(err) => write!(f, "Description failed: {}", err),
            ExpressionError::Explode(err) => write!(f, "Expansion failed: {}", err),
            ExpressionError::Evaluation(err) => write!(f, "Evaluation failed: {}", err),
            ExpressionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ExpressionError::IoError(err) => write!(f, "IO error: {}", err),
            ExpressionError::JsonError(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for ExpressionError {}

impl From<Violation> for ExpressionError {
    fn from(violation: Violation) -> Self {
        ExpressionError::Validation(violation)
    }
}

impl From<DescriptionError> for ExpressionError {
    fn from(err: DescriptionError) -> Self {
        ExpressionError::Description(err)
    }
}

impl From<ExplodeError> for ExpressionError {
    fn from(err: ExplodeError) -> Self {
        ExpressionError::Explode(err)
    }
}

impl From<EvaluationError> for ExpressionError {
    fn from(err: EvaluationError) -> Self {
        ExpressionError::Evaluation(err)
    }
}

impl From<std::io::Error> for ExpressionError {
    fn from(err: std::io::Error) -> Self {
        ExpressionError::IoError(err)
    }
}

impl From<serde_json::Error> for ExpressionError {
    fn from(err: serde_json::Error) -> Self {
        ExpressionError::JsonError(err)
    }
}

impl From<String> for ExpressionError {
    fn from(message: String) -> Self {
        ExpressionError::InvalidInput(message)
    }
}

impl axum::response::IntoResponse for ExpressionError {
    fn into_response(self) -> axum::response::Response {
        self.into()
    }
}

impl From<ExpressionError> for axum::response::Response {
    fn from(err: ExpressionError) -> Self {
        use axum::Json;
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let (status, code, message) = match &err {
            ExpressionError::Validation(violation) => (
                StatusCode::CONFLICT,
                violation.code(),
                violation.to_string(),
            ),
            ExpressionError::Description(inner) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unresolved_reference", inner.to_string())
            }
            ExpressionError::Explode(inner) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "explode_failed", inner.to_string())
            }
            ExpressionError::Evaluation(inner) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_result", inner.to_string())
            }
            ExpressionError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
            }
            ExpressionError::JsonError(inner) => {
                (StatusCode::BAD_REQUEST, "invalid_json", inner.to_string())
            }
            ExpressionError::IoError(inner) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                inner.to_string(),
            ),
        };

        let body = serde_json::json!({
            "status": "ERROR",
            "code": code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
