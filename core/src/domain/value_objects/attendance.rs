//! Attendance status, verification method, and the derived verification state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored attendance status of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Registered, not yet checked in
    Pending,
    /// Attendance verified
    Present,
    /// Marked absent by the organizer after the event
    Absent,
}

impl AttendanceStatus {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "pending",
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl Default for AttendanceStatus {
    fn default() -> Self {
        AttendanceStatus::Pending
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AttendanceStatus::Pending),
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            _ => Err(format!("Invalid attendance status: {}", s)),
        }
    }
}

/// How a registration's attendance was (or will be) verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMethod {
    /// Participant entered the attendance token
    Token,
    /// Organizer checked the participant in by hand
    Manual,
    /// Token scanned from a QR code
    QrCode,
}

impl VerificationMethod {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationMethod::Token => "token",
            VerificationMethod::Manual => "manual",
            VerificationMethod::QrCode => "qr_code",
        }
    }
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token" => Ok(VerificationMethod::Token),
            "manual" => Ok(VerificationMethod::Manual),
            "qr_code" => Ok(VerificationMethod::QrCode),
            _ => Err(format!("Invalid verification method: {}", s)),
        }
    }
}

/// Verification state of a registration
///
/// `Verified` is terminal: no operation moves a registration back to `Unverified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttendanceState {
    /// Not checked in; `status` is `Pending` or `Absent`
    Unverified { status: AttendanceStatus },
    /// Checked in at `verified_at`
    Verified {
        verified_at: DateTime<Utc>,
        method: Option<VerificationMethod>,
    },
}

impl AttendanceState {
    pub fn is_verified(&self) -> bool {
        matches!(self, AttendanceState::Verified { .. })
    }
}

/// Per-event attendance counts for organizer dashboards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub event_id: i64,
    pub total: u64,
    pub pending: u64,
    pub present: u64,
    pub absent: u64,
    pub certificates_issued: u64,
}

impl AttendanceSummary {
    /// Share of registrations that checked in, in the range `0.0..=1.0`
    pub fn attendance_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.present as f64 / self.total as f64
        }
    }
}
