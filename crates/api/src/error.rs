use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use topsky_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// The ACARS clients expect a `{"message": ...}` error envelope, so this
/// maps every failure onto that shape. Authentication failures are
/// deliberately uniform: the response never reveals whether the
/// identifier or the secret was wrong, nor whether a session token was
/// expired, malformed, or orphaned.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `topsky-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Login failed -- any cause, uniform message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A gated endpoint was called without a resolvable session value.
    #[error("Authentication required")]
    AuthRequired,

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Input failed field validation; `errors` holds the per-field detail.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        message: &'static str,
        errors: serde_json::Value,
    },

    /// An internal error with a human-readable message (never echoed).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid credentials" }),
            ),
            AppError::AuthRequired => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Authentication required" }),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "message": msg }))
            }
            AppError::ValidationFailed { message, errors } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": message, "errors": errors }),
            ),
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, json!({ "message": msg }))
                }
                CoreError::Unauthorized(_) => (
                    StatusCode::UNAUTHORIZED,
                    json!({ "message": "Authentication required" }),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "message": "An internal error occurred" }),
                    )
                }
            },
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "An internal error occurred" }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "An internal error occurred" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
