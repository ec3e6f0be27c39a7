//! Attendance token validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of digits in an attendance token
pub const ATTENDANCE_TOKEN_LENGTH: usize = 10;

/// Exactly ten ASCII digits, leading zeros allowed
pub static ATTENDANCE_TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("static token pattern is valid"));

/// Check that a presented token has the attendance token shape
pub fn is_valid_attendance_token(token: &str) -> bool {
    ATTENDANCE_TOKEN_REGEX.is_match(token)
}

/// Mask all but the last four characters, for log output
pub fn mask_token(token: &str) -> String {
    let visible = 4.min(token.len());
    let hidden = token.chars().count().saturating_sub(visible);
    let tail: String = token.chars().skip(hidden).collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
