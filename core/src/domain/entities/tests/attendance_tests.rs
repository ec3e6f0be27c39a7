//! Unit tests for attendance entity

use chrono::{TimeZone, Utc};

use crate::domain::entities::attendance::{Attendance, RequestProvenance};
use crate::domain::entities::registration::Registration;

#[test]
fn test_attendance_copies_registration_references() {
    let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
    let reg = Registration::new(7, 3, 42, "REG-0007", now);
    let provenance = RequestProvenance::new(
        Some("203.0.113.9".to_string()),
        Some("Mozilla/5.0".to_string()),
    );

    let attendance = Attendance::for_registration(&reg, now, provenance);

    assert_eq!(attendance.registration_id, 7);
    assert_eq!(attendance.event_id, 3);
    assert_eq!(attendance.participant_id, 42);
    assert_eq!(attendance.time_in, now);
    assert_eq!(attendance.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(attendance.user_agent.as_deref(), Some("Mozilla/5.0"));
    assert!(!attendance.is_checked_out());
}

#[test]
fn test_each_attendance_gets_its_own_id() {
    let now = Utc::now();
    let reg = Registration::new(1, 1, 1, "REG-0001", now);

    let a = Attendance::for_registration(&reg, now, RequestProvenance::default());
    let b = Attendance::for_registration(&reg, now, RequestProvenance::default());
    assert_ne!(a.id, b.id);
}
