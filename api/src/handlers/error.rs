//! Domain error to HTTP response mapping

use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use ev_core::errors::{AttendanceError, DomainError};
use ev_shared::{error_codes, ErrorResponse};

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Attendance(err) => match err {
            AttendanceError::WrongEvent | AttendanceError::InvalidToken => StatusCode::BAD_REQUEST,
            AttendanceError::RegistrationNotFound => StatusCode::NOT_FOUND,
            AttendanceError::AlreadyVerified
            | AttendanceError::NotEligibleForCertificate
            | AttendanceError::NotCheckedIn
            | AttendanceError::AlreadyCheckedOut => StatusCode::CONFLICT,
            AttendanceError::TokenExpired => StatusCode::GONE,
            AttendanceError::TokenSpaceExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Store and internal failures are logged with their detail and answered
/// with a generic message.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let status = status_for(&error);

    let message = match &error {
        DomainError::StoreUnavailable { .. } => {
            tracing::error!(error = %error, "Registration store unavailable");
            "Service temporarily unavailable. Please try again later".to_string()
        }
        DomainError::Internal { .. } => {
            tracing::error!(error = %error, "Internal error");
            "An internal error occurred".to_string()
        }
        DomainError::Attendance(AttendanceError::TokenSpaceExhausted { .. }) => {
            tracing::error!(error = %error, "Attendance token allocation failed");
            "Could not issue an attendance token. Please try again later".to_string()
        }
        DomainError::Attendance(AttendanceError::TokenExpired) => {
            "Attendance token has expired. Please request a new token".to_string()
        }
        DomainError::Attendance(AttendanceError::WrongEvent) => {
            "This attendance token is not valid for this event".to_string()
        }
        _ => error.to_string(),
    };

    HttpResponse::build(status).json(ErrorResponse::new(error.code(), message))
}

/// 400 response listing the failed fields
pub fn validation_error_response(errors: ValidationErrors) -> HttpResponse {
    let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data")
        .add_detail("validation_errors", errors);

    HttpResponse::BadRequest().json(body)
}
