//! Registration repository trait defining the interface for registration and
//! attendance persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{Attendance, Registration};
use crate::domain::value_objects::AttendanceSummary;
use crate::errors::DomainError;

use super::types::{
    AssignTokenOutcome, CheckOutOutcome, TokenAssignment, VerificationCompletion,
    VerifiedAttendance,
};

/// Repository trait for Registration and Attendance persistence operations
///
/// Implementations own the atomicity guarantees of the attendance workflow:
/// - `attendance_token` is unique across all registrations
/// - at most one attendance exists per registration
/// - `complete_verification` applies the registration update and the
///   attendance insert as one unit, guarded by "still unverified"
///
/// Infrastructure failures are reported as `DomainError::StoreUnavailable`.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Persist a new registration
    ///
    /// Fails with `DomainError::Validation` if the id, number, or token is
    /// already taken.
    async fn create(&self, registration: Registration) -> Result<Registration, DomainError>;

    /// Find a registration by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DomainError>;

    /// Find the registration currently holding `token`
    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, DomainError>;

    /// Write a freshly drawn token to an unverified registration
    ///
    /// # Returns
    /// * `Ok(AssignTokenOutcome::Assigned(_))` - Token stored, status reset to pending, method set to token
    /// * `Ok(AssignTokenOutcome::Conflict)` - Token already held by another registration
    /// * `Ok(AssignTokenOutcome::AlreadyVerified)` - Registration verified in the meantime
    /// * `Ok(AssignTokenOutcome::NotFound)` - No such registration
    async fn assign_token(
        &self,
        registration_id: i64,
        assignment: TokenAssignment,
    ) -> Result<AssignTokenOutcome, DomainError>;

    /// Mark the registration verified and insert its attendance, atomically
    ///
    /// When `expected_token` is set the write also requires the stored token
    /// to still equal it.
    ///
    /// # Returns
    /// * `Ok(Some(_))` - Both writes applied
    /// * `Ok(None)` - Registration missing, already verified, or its token
    ///   replaced; nothing written
    async fn complete_verification(
        &self,
        completion: VerificationCompletion,
    ) -> Result<Option<VerifiedAttendance>, DomainError>;

    /// Set `has_received_certificate` if the registration is verified and has
    /// not received one yet
    ///
    /// # Returns
    /// * `Ok(Some(_))` - The updated registration
    /// * `Ok(None)` - Condition did not hold; nothing written
    async fn mark_certificate_received(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Registration>, DomainError>;

    /// Find the attendance of a registration
    async fn find_attendance(&self, registration_id: i64)
        -> Result<Option<Attendance>, DomainError>;

    /// Set `time_out` on the registration's attendance if not yet set
    async fn record_check_out(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<CheckOutOutcome, DomainError>;

    /// Move every pending registration of the event to absent
    ///
    /// # Returns
    /// Number of registrations updated
    async fn mark_pending_as_absent(
        &self,
        event_id: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Attendance counts for an event
    async fn summarize_event(&self, event_id: i64) -> Result<AttendanceSummary, DomainError>;

    /// Check whether any registration holds `token`
    async fn token_exists(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_token(token).await?.is_some())
    }
}
