//! Error handling for Gatherly
//!
//! This module defines the main error type used throughout the application
//! and its mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::utils::response;

/// Main error type for Gatherly operations
#[derive(Error, Debug)]
pub enum GatherlyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("User {user_id} has already reserved a spot at event {event_id}")]
    AlreadyReserved { event_id: i64, user_id: i64 },

    #[error("User {user_id} has no reservation at event {event_id}")]
    NotReserved { event_id: i64, user_id: i64 },

    #[error("Event {event_id} is fully booked")]
    CapacityExceeded { event_id: i64 },

    #[error("Admission update rejected for event {event_id} with no matching cause")]
    AdmissionFailed { event_id: i64 },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Token validation error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gatherly operations
pub type Result<T> = std::result::Result<T, GatherlyError>;

impl GatherlyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatherlyError::EventNotFound { .. } => StatusCode::NOT_FOUND,
            GatherlyError::AlreadyReserved { .. }
            | GatherlyError::NotReserved { .. }
            | GatherlyError::CapacityExceeded { .. }
            | GatherlyError::AdmissionFailed { .. }
            | GatherlyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatherlyError::Unauthorized(_) | GatherlyError::Jwt(_) => StatusCode::UNAUTHORIZED,
            GatherlyError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            GatherlyError::Database(_)
            | GatherlyError::Migration(_)
            | GatherlyError::Config(_)
            | GatherlyError::Serialization(_)
            | GatherlyError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code included in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            GatherlyError::EventNotFound { .. } => "EVENT_NOT_FOUND",
            GatherlyError::AlreadyReserved { .. } => "ALREADY_RESERVED",
            GatherlyError::NotReserved { .. } => "NOT_RESERVED",
            GatherlyError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            GatherlyError::AdmissionFailed { .. } => "ADMISSION_FAILED",
            GatherlyError::Unauthorized(_) | GatherlyError::Jwt(_) => "UNAUTHORIZED",
            GatherlyError::PermissionDenied(_) => "PERMISSION_DENIED",
            GatherlyError::InvalidInput(_) => "INVALID_INPUT",
            GatherlyError::Database(_) => "DATABASE_ERROR",
            GatherlyError::Migration(_) => "MIGRATION_ERROR",
            GatherlyError::Config(_) => "CONFIG_ERROR",
            GatherlyError::Serialization(_) => "SERIALIZATION_ERROR",
            GatherlyError::Io(_) => "IO_ERROR",
        }
    }

    /// Whether the internal error detail may be shown to the client.
    fn is_public(&self) -> bool {
        !matches!(
            self,
            GatherlyError::Database(_)
                | GatherlyError::Migration(_)
                | GatherlyError::Config(_)
                | GatherlyError::Serialization(_)
                | GatherlyError::Io(_)
        )
    }
}

impl IntoResponse for GatherlyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, code = self.code(), "Request failed");
        }

        // Internal details stay in the logs, not in the response body.
        let message = if self.is_public() {
            self.to_string()
        } else {
            "Internal server error".to_string()
        };

        response::error(self.code(), message, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_codes() {
        assert_eq!(
            GatherlyError::EventNotFound { event_id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatherlyError::AlreadyReserved { event_id: 1, user_id: 2 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatherlyError::CapacityExceeded { event_id: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatherlyError::Unauthorized("no token".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatherlyError::PermissionDenied("not the creator".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_infrastructure_detail_is_hidden() {
        let err = GatherlyError::Database(sqlx::Error::PoolClosed);
        assert!(!err.is_public());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
