//! Error handling for gatherly
//!
//! This module defines the main error type used throughout the application
//! and the mapping from error kinds to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for the gatherly application
#[derive(Error, Debug)]
pub enum GatherlyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Club not found: {club_id}")]
    ClubNotFound { club_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Review not found: {review_id}")]
    ReviewNotFound { review_id: i64 },

    #[error("Category not found: {category_id}")]
    CategoryNotFound { category_id: i64 },

    #[error("One or more cities do not exist")]
    CityNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Result type alias for gatherly operations
pub type Result<T> = std::result::Result<T, GatherlyError>;

impl GatherlyError {
    /// HTTP status this error surfaces as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatherlyError::UserNotFound { .. }
            | GatherlyError::ClubNotFound { .. }
            | GatherlyError::EventNotFound { .. }
            | GatherlyError::ReviewNotFound { .. }
            | GatherlyError::CategoryNotFound { .. }
            | GatherlyError::CityNotFound => StatusCode::NOT_FOUND,
            GatherlyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatherlyError::Conflict(_) => StatusCode::CONFLICT,
            GatherlyError::Unauthorized(_) | GatherlyError::Token(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatherlyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Infrastructure failures are logged in full but surfaced opaquely.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
