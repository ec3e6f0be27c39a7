//! Attendance workflow error types
//!
//! Every verification failure is recoverable by the caller: the participant can
//! re-request a token or contact the organizer. Callers distinguish the variants
//! to choose the user-facing message.

use ev_shared::error_codes;
use thiserror::Error;

// Re-export shared ErrorResponse for API layers
pub use ev_shared::types::response::ErrorResponse;

/// Attendance token, verification, and certificate errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("Registration not found")]
    RegistrationNotFound,

    /// Registration belongs to a different event than the one presented
    #[error("Attendance token does not belong to this event")]
    WrongEvent,

    #[error("Invalid attendance token")]
    InvalidToken,

    #[error("Attendance already verified")]
    AlreadyVerified,

    #[error("Attendance token has expired")]
    TokenExpired,

    #[error("Could not allocate a unique attendance token after {attempts} attempts")]
    TokenSpaceExhausted { attempts: u32 },

    #[error("Registration is not eligible for a certificate")]
    NotEligibleForCertificate,

    #[error("Participant has not checked in")]
    NotCheckedIn,

    #[error("Participant already checked out")]
    AlreadyCheckedOut,
}

impl AttendanceError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceError::RegistrationNotFound => error_codes::REGISTRATION_NOT_FOUND,
            AttendanceError::WrongEvent => error_codes::WRONG_EVENT,
            AttendanceError::InvalidToken => error_codes::INVALID_TOKEN,
            AttendanceError::AlreadyVerified => error_codes::ALREADY_VERIFIED,
            AttendanceError::TokenExpired => error_codes::TOKEN_EXPIRED,
            AttendanceError::TokenSpaceExhausted { .. } => error_codes::TOKEN_SPACE_EXHAUSTED,
            AttendanceError::NotEligibleForCertificate => {
                error_codes::NOT_ELIGIBLE_FOR_CERTIFICATE
            }
            AttendanceError::NotCheckedIn => error_codes::NOT_CHECKED_IN,
            AttendanceError::AlreadyCheckedOut => error_codes::ALREADY_CHECKED_OUT,
        }
    }

    /// Whether the failure came from one of the verification preconditions
    pub fn is_verification_rejection(&self) -> bool {
        matches!(
            self,
            AttendanceError::WrongEvent
                | AttendanceError::InvalidToken
                | AttendanceError::AlreadyVerified
                | AttendanceError::TokenExpired
        )
    }
}

/// Convert AttendanceError to ErrorResponse
impl From<AttendanceError> for ErrorResponse {
    fn from(err: AttendanceError) -> Self {
        ErrorResponse::new(err.code(), err.to_string())
    }
}
