use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the hit counter store.
/// Only `Unavailable` ever leaves the store; write and read failures are
/// logged and absorbed by `increment` and `snapshot`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Hit store unavailable: {0}")]
    Unavailable(String),

    #[error("Hit count write failed: {0}")]
    Write(String),

    #[error("Hit count read failed: {0}")]
    Read(String),
}

impl StoreError {
    pub fn unavailable(err: sqlx::Error) -> Self {
        Self::Unavailable(describe(&err))
    }

    pub fn write(err: sqlx::Error) -> Self {
        Self::Write(describe(&err))
    }

    pub fn read(err: sqlx::Error) -> Self {
        Self::Read(describe(&err))
    }
}

// SQLite reports constraint and busy errors through the database error;
// everything else (pool closed, I/O) through the top-level message.
fn describe(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("{} (code: {})", db_err.message(), code),
            None => db_err.message().to_string(),
        },
        sqlx::Error::PoolTimedOut => "timed out waiting for a connection".to_string(),
        sqlx::Error::PoolClosed => "connection pool is closed".to_string(),
        other => other.to_string(),
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(ref resource) => {
                tracing::debug!("Resource not found: {}", resource);
                (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{} not found", resource),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;
