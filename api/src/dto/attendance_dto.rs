use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use ev_core::{AttendanceSummary, Attendance, Registration, VerificationMethod};
use ev_shared::validation::is_valid_attendance_token;
use ev_shared::ResponseStatus;

fn validate_attendance_token(token: &str) -> Result<(), ValidationError> {
    if is_valid_attendance_token(token) {
        Ok(())
    } else {
        Err(ValidationError::new("attendance_token_format"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyAttendanceRequest {
    /// Exactly ten digits
    #[validate(length(equal = 10), custom = "validate_attendance_token")]
    pub token: String,
    #[validate(range(min = 1))]
    pub event_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckInRequest {
    #[validate(range(min = 1))]
    pub registration_id: i64,
    #[validate(range(min = 1))]
    pub event_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(range(min = 1))]
    pub registration_id: i64,
}

/// Participant details returned after a successful verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub registration_id: i64,
    pub registration_number: String,
    pub participant_id: i64,
    pub event_id: i64,
    pub verified_at: Option<DateTime<Utc>>,
    pub verification_method: Option<VerificationMethod>,
    pub time_in: DateTime<Utc>,
}

impl ParticipantInfo {
    pub fn new(registration: &Registration, attendance: &Attendance) -> Self {
        Self {
            registration_id: registration.id,
            registration_number: registration.registration_number.clone(),
            participant_id: registration.participant_id,
            event_id: registration.event_id,
            verified_at: registration.attendance_verified_at,
            verification_method: registration.verification_method,
            time_in: attendance.time_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAttendanceResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantInfo>,
}

/// Plain `{ status, message }` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceTokenResponse {
    pub status: ResponseStatus,
    pub registration_id: i64,
    pub attendance_token: Option<String>,
    pub token_generated_at: Option<DateTime<Utc>>,
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl From<&Registration> for AttendanceTokenResponse {
    fn from(registration: &Registration) -> Self {
        Self {
            status: ResponseStatus::Success,
            registration_id: registration.id,
            attendance_token: registration.attendance_token.clone(),
            token_generated_at: registration.token_generated_at,
            token_expires_at: registration.token_expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub registration_id: i64,
    pub time_in: DateTime<Utc>,
    pub time_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenteesResponse {
    pub status: ResponseStatus,
    pub event_id: i64,
    pub marked_absent: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSummaryResponse {
    pub status: ResponseStatus,
    #[serde(flatten)]
    pub summary: AttendanceSummary,
    /// Share of registrations verified present, 0.0 to 1.0
    pub attendance_rate: f64,
}

impl From<AttendanceSummary> for AttendanceSummaryResponse {
    fn from(summary: AttendanceSummary) -> Self {
        let attendance_rate = summary.attendance_rate();
        Self {
            status: ResponseStatus::Success,
            summary,
            attendance_rate,
        }
    }
}
