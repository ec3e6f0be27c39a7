//! Attendance entity, created once per registration on successful verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::registration::Registration;

/// Request metadata recorded with an attendance; informational only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestProvenance {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestProvenance {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }
}

/// Attendance record of a verified registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier for the attendance record
    pub id: Uuid,

    pub event_id: i64,
    pub participant_id: i64,

    /// Owning registration; at most one attendance per registration
    pub registration_id: i64,

    /// Verification time
    pub time_in: DateTime<Utc>,

    /// Check-out time, set at most once
    pub time_out: Option<DateTime<Utc>>,

    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Attendance {
    /// Builds the attendance for `registration` checked in at `time_in`
    pub fn for_registration(
        registration: &Registration,
        time_in: DateTime<Utc>,
        provenance: RequestProvenance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: registration.event_id,
            participant_id: registration.participant_id,
            registration_id: registration.id,
            time_in,
            time_out: None,
            ip_address: provenance.ip_address,
            user_agent: provenance.user_agent,
            created_at: time_in,
        }
    }

    pub fn is_checked_out(&self) -> bool {
        self.time_out.is_some()
    }
}
