//! Inputs and outcomes of registration repository operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Attendance, Registration};
use crate::domain::value_objects::VerificationMethod;

/// Token fields written by the issuer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAssignment {
    /// 10-digit token
    pub token: String,
    pub generated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of writing a token to a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTokenOutcome {
    /// Token stored; the updated registration
    Assigned(Registration),
    /// Another registration already holds the token
    Conflict,
    /// Registration was verified before the write; nothing changed
    AlreadyVerified,
    /// No registration with that id
    NotFound,
}

/// Writes performed atomically when attendance is verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCompletion {
    pub registration_id: i64,
    pub verified_at: DateTime<Utc>,
    pub method: VerificationMethod,
    /// Token the participant presented; when set, the stored token must
    /// still equal it at the moment of the write. `None` for manual check-in.
    pub expected_token: Option<String>,
    /// Attendance inserted in the same unit as the registration update
    pub attendance: Attendance,
}

/// A verified registration with its attendance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedAttendance {
    pub registration: Registration,
    pub attendance: Attendance,
}

/// Result of recording a check-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutOutcome {
    Recorded(Attendance),
    NotCheckedIn,
    AlreadyCheckedOut,
}
