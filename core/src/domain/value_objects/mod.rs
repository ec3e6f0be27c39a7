//! Value objects describing attendance state.

pub mod attendance;

pub use attendance::{AttendanceState, AttendanceStatus, AttendanceSummary, VerificationMethod};
