//! Mobile Error Types
//!
//! Mobile-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Gate failures (400) never reach this
//! type; it covers what happens after validation passed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::database::DatabaseError;
use thiserror::Error;

/// Mobile-specific result type alias
pub type MobileResult<T> = Result<T, MobileError>;

/// Mobile-specific error variants
#[derive(Debug, Error)]
pub enum MobileError {
    /// Identifier does not resolve to a record
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// Input passed the gate but breaks a domain invariant
    #[error("{field} {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    /// Unique value already taken
    #[error("{0}")]
    Duplicate(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Persistence client could not hand out a connection
    #[error("Database unavailable: {0}")]
    Unavailable(#[source] DatabaseError),
}

impl MobileError {
    pub fn not_found(resource: &'static str, id: impl Into<i64>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn invalid(field: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            field,
            message: message.to_string(),
        }
    }

    /// Get the ErrorKind for this error
    ///
    /// Database errors are classified coarsely here; the response uses the
    /// kernel's full sqlx mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MobileError::NotFound { .. } => ErrorKind::NotFound,
            MobileError::Invalid { .. } => ErrorKind::UnprocessableEntity,
            MobileError::Duplicate(_) => ErrorKind::Conflict,
            MobileError::Database(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
            )
            | MobileError::Unavailable(_) => ErrorKind::ServiceUnavailable,
            MobileError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            MobileError::Invalid { field, message } => {
                let details = serde_json::json!([{ "field": field, "message": message }]);
                AppError::unprocessable(format!("{field} {message}"))
                    .with_action("Correct the listed field and retry")
                    .with_details(details)
            }
            MobileError::Database(e) => AppError::from(e),
            MobileError::Unavailable(e) => {
                AppError::service_unavailable("Database unavailable").with_source(e)
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    ///
    /// 5xx errors are logged by the kernel when rendered.
    fn log(&self) {
        match self {
            MobileError::Duplicate(message) => {
                tracing::warn!(message = %message, "Duplicate mobile record");
            }
            MobileError::Database(_) | MobileError::Unavailable(_) => {}
            _ => {
                tracing::debug!(error = %self, "Mobile request failed");
            }
        }
    }
}

impl IntoResponse for MobileError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<DatabaseError> for MobileError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Query(e) => MobileError::Database(e),
            other => MobileError::Unavailable(other),
        }
    }
}
