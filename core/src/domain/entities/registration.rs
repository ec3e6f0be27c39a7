//! Registration entity: one participant's place at one event.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AttendanceState, AttendanceStatus, VerificationMethod};

/// Default lifetime of an attendance token (1 day)
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Registration of a participant for an event
///
/// The record is a plain data shape. State transitions are performed by the
/// attendance services against a repository, never by mutating a loaded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Store identifier
    pub id: i64,

    /// Event this registration belongs to
    pub event_id: i64,

    /// Registered participant
    pub participant_id: i64,

    /// Human-readable registration number, unique
    pub registration_number: String,

    /// 10-digit attendance token, unique across all registrations
    pub attendance_token: Option<String>,

    /// When the current token was issued
    pub token_generated_at: Option<DateTime<Utc>>,

    /// When the current token stops being accepted; `None` never expires
    pub token_expires_at: Option<DateTime<Utc>>,

    /// Stored attendance status
    pub attendance_status: AttendanceStatus,

    /// How attendance was or will be verified
    pub verification_method: Option<VerificationMethod>,

    /// Set exactly when `attendance_status` is `Present`
    pub attendance_verified_at: Option<DateTime<Utc>>,

    /// Whether a certificate has been issued
    pub has_received_certificate: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Registration {
    /// Creates a pending registration without an attendance token
    pub fn new(
        id: i64,
        event_id: i64,
        participant_id: i64,
        registration_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            event_id,
            participant_id,
            registration_number: registration_number.into(),
            attendance_token: None,
            token_generated_at: None,
            token_expires_at: None,
            attendance_status: AttendanceStatus::Pending,
            verification_method: None,
            attendance_verified_at: None,
            has_received_certificate: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Explicit verification state derived from the stored fields
    pub fn attendance_state(&self) -> AttendanceState {
        match self.attendance_verified_at {
            Some(verified_at) => AttendanceState::Verified {
                verified_at,
                method: self.verification_method,
            },
            None => AttendanceState::Unverified {
                status: self.attendance_status,
            },
        }
    }

    /// Whether attendance has been verified; permanent once true
    pub fn is_attendance_verified(&self) -> bool {
        self.attendance_verified_at.is_some()
    }

    /// Whether a token has been issued
    pub fn has_token(&self) -> bool {
        self.attendance_token.is_some()
    }

    /// Whether the token is no longer accepted at `now`
    ///
    /// A token is accepted only while its expiry lies strictly in the future.
    /// A missing expiry never expires.
    pub fn is_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.token_expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }

    /// Remaining token lifetime at `now`, zero once expired, `None` if it never expires
    pub fn token_time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.token_expires_at.map(|expires_at| {
            if expires_at > now {
                expires_at - now
            } else {
                Duration::zero()
            }
        })
    }

    /// Whether the registration belongs to `event_id`
    pub fn belongs_to_event(&self, event_id: i64) -> bool {
        self.event_id == event_id
    }

    /// Certificate eligibility: verified and not yet issued
    pub fn can_receive_certificate(&self) -> bool {
        self.is_attendance_verified() && !self.has_received_certificate
    }

    /// Checks the stored fields agree: verified timestamp iff status is present
    pub fn is_consistent(&self) -> bool {
        self.attendance_verified_at.is_some()
            == (self.attendance_status == AttendanceStatus::Present)
    }
}
