//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] postgate_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] postgate_auth::AuthError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            // Unknown users get 400, not 404
            ApiError::UserNotFound => StatusCode::BAD_REQUEST,
            ApiError::WrongPassword => StatusCode::FORBIDDEN,
            ApiError::Internal(_) | ApiError::Database(_) | ApiError::Auth(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the client
    ///
    /// Internal failures are logged here and replaced by a generic message.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) | ApiError::Database(_) | ApiError::Auth(_) => {
                error!("Request failed: {}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = axum::Json(json!({
            "message": self.public_message()
        }));

        (status, body).into_response()
    }
}
