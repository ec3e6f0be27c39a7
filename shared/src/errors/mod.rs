//! Shared error codes

pub use crate::types::response::ErrorResponse;

/// Machine-readable error codes returned in `ErrorResponse::error`
pub mod error_codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const STORE_UNAVAILABLE: &str = "store_unavailable";
    pub const REGISTRATION_NOT_FOUND: &str = "registration_not_found";
    pub const WRONG_EVENT: &str = "wrong_event";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const ALREADY_VERIFIED: &str = "already_verified";
    pub const TOKEN_EXPIRED: &str = "token_expired";
    pub const TOKEN_SPACE_EXHAUSTED: &str = "token_space_exhausted";
    pub const NOT_ELIGIBLE_FOR_CERTIFICATE: &str = "not_eligible_for_certificate";
    pub const NOT_CHECKED_IN: &str = "not_checked_in";
    pub const ALREADY_CHECKED_OUT: &str = "already_checked_out";
}
