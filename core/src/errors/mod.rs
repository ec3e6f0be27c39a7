//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types and utilities
pub use types::{AttendanceError, ErrorResponse};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Backing store could not be reached or rejected the operation
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Attendance(#[from] AttendanceError),
}

impl DomainError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        use ev_shared::error_codes;

        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::NotFound { .. } => error_codes::NOT_FOUND,
            DomainError::StoreUnavailable { .. } => error_codes::STORE_UNAVAILABLE,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Attendance(err) => err.code(),
        }
    }

    /// The attendance failure, if this is one
    pub fn as_attendance(&self) -> Option<&AttendanceError> {
        match self {
            DomainError::Attendance(err) => Some(err),
            _ => None,
        }
    }

    /// Shorthand used by store implementations
    pub fn store(message: impl std::fmt::Display) -> Self {
        DomainError::StoreUnavailable {
            message: message.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
