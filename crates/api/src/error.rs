use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tradein_core::error::CoreError;

/// Error returned by every handler.
///
/// Renders as `{ "error": <message>, "code": <CODE> }`. Messages of internal
/// failures are logged and replaced with a generic one.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

type ErrorParts = (StatusCode, &'static str, String);

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, key } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found: {key}"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Integrity(msg) => {
            tracing::error!(error = %msg, "Reference data integrity violation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTEGRITY_ERROR",
                msg.clone(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Engine failure");
            internal()
        }
    }
}

/// `RowNotFound` is a 404 and a unique violation on a `uq_*` constraint a
/// 409. Anything else is logged and sanitized.
fn sqlx_parts(err: &sqlx::Error) -> ErrorParts {
    if let sqlx::Error::RowNotFound = err {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    if let Some(constraint) = err
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
        .filter(|name| name.starts_with("uq_"))
    {
        return (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        );
    }

    tracing::error!(error = %err, "Database error");
    internal()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(err) => core_parts(err),
            AppError::Database(err) => sqlx_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}
