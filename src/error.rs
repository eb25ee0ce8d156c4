use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tokio::task::JoinError;
use tracing::{debug, error};

#[derive(Debug, ThisError)]
pub enum AppError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(SqlxError),

    #[error("Store error: {0}")]
    Store(SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] JoinError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,
}

impl From<SqlxError> for AppError {
    fn from(e: SqlxError) -> Self {
        match e {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                AppError::StoreUnavailable(e)
            }
            other => AppError::Store(other),
        }
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(e: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_)
            | AppError::Store(_)
            | AppError::PasswordHash(_)
            | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            AppError::InvalidCredentials | AppError::NotFound => {
                debug!(outcome = %self, "request resolved without a record");
                self.to_string()
            }
            AppError::BadRequest(_) => {
                debug!(reason = %self, "rejected malformed request");
                self.to_string()
            }
            _ => {
                error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
        };
        (status, Json(MessageBody { message })).into_response()
    }
}

/// Every failure body is a single `message` field.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_store_unavailable() {
        assert!(matches!(
            AppError::from(SqlxError::PoolTimedOut),
            AppError::StoreUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(SqlxError::RowNotFound),
            AppError::Store(_)
        ));
    }

    #[test]
    fn outcomes_map_to_client_statuses() {
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BadRequest("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::StoreUnavailable(SqlxError::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
