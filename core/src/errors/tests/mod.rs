//! Unit tests for domain error types

use crate::errors::{AttendanceError, DomainError, ErrorResponse};

#[test]
fn test_attendance_error_codes_are_distinct() {
    let errors = [
        AttendanceError::RegistrationNotFound,
        AttendanceError::WrongEvent,
        AttendanceError::InvalidToken,
        AttendanceError::AlreadyVerified,
        AttendanceError::TokenExpired,
        AttendanceError::TokenSpaceExhausted { attempts: 10 },
        AttendanceError::NotEligibleForCertificate,
        AttendanceError::NotCheckedIn,
        AttendanceError::AlreadyCheckedOut,
    ];
    let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn test_domain_error_wraps_attendance_error() {
    let err: DomainError = AttendanceError::TokenExpired.into();
    assert_eq!(err.code(), "token_expired");
    assert_eq!(err.as_attendance(), Some(&AttendanceError::TokenExpired));
    assert_eq!(err.to_string(), "Attendance token has expired");
}

#[test]
fn test_store_unavailable_code() {
    let err = DomainError::store("connection refused");
    assert_eq!(err.code(), "store_unavailable");
    assert!(err.as_attendance().is_none());
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_error_response_conversion() {
    let response: ErrorResponse = AttendanceError::AlreadyVerified.into();
    assert_eq!(response.error, "already_verified");
    assert_eq!(response.message, "Attendance already verified");
}

#[test]
fn test_verification_rejections() {
    assert!(AttendanceError::WrongEvent.is_verification_rejection());
    assert!(AttendanceError::TokenExpired.is_verification_rejection());
    assert!(!AttendanceError::NotEligibleForCertificate.is_verification_rejection());
    assert!(!AttendanceError::TokenSpaceExhausted { attempts: 3 }.is_verification_rejection());
}

#[test]
fn test_exhaustion_message_includes_attempts() {
    let err = AttendanceError::TokenSpaceExhausted { attempts: 10 };
    assert!(err.to_string().contains("10 attempts"));
}
