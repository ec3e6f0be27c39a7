//! Attendance verification and organizer attendance operations

use std::sync::Arc;

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;

use crate::domain::entities::{Attendance, Registration, RequestProvenance};
use crate::domain::value_objects::{AttendanceSummary, VerificationMethod};
use crate::errors::{AttendanceError, DomainError, DomainResult};
use crate::repositories::{
    CheckOutOutcome, RegistrationRepository, VerificationCompletion, VerifiedAttendance,
};

use super::providers::Clock;
use super::types::{VerificationRequest, VerificationTarget};

/// Check a presented token against a registration at `now`
///
/// Preconditions are evaluated in a fixed order and the first failure wins:
/// event, token, verification state, expiry.
pub fn check_preconditions(
    registration: &Registration,
    presented_token: &str,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<(), AttendanceError> {
    if !registration.belongs_to_event(event_id) {
        return Err(AttendanceError::WrongEvent);
    }

    let matches = registration
        .attendance_token
        .as_deref()
        .map(|stored| constant_time_eq(stored.as_bytes(), presented_token.as_bytes()))
        .unwrap_or(false);
    if !matches {
        return Err(AttendanceError::InvalidToken);
    }

    if registration.is_attendance_verified() {
        return Err(AttendanceError::AlreadyVerified);
    }

    if registration.is_token_expired_at(now) {
        return Err(AttendanceError::TokenExpired);
    }

    Ok(())
}

/// Verifies attendance tokens and records attendance
pub struct AttendanceVerifier<R: RegistrationRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: RegistrationRepository> AttendanceVerifier<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Verify a presented token and record attendance
    ///
    /// On success the registration becomes `present` and exactly one
    /// attendance is inserted, both in one atomic store operation. A failed
    /// attempt writes nothing.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifiedAttendance)` - The verified registration and its attendance
    /// * `Err(AttendanceError::RegistrationNotFound)` - Unknown registration id
    /// * `Err(AttendanceError::WrongEvent)` - Registration belongs to another event
    /// * `Err(AttendanceError::InvalidToken)` - Token unknown, not equal to the stored one,
    ///   or replaced before the write
    /// * `Err(AttendanceError::AlreadyVerified)` - Verified earlier, or by a concurrent request
    /// * `Err(AttendanceError::TokenExpired)` - Token expiry is not after now
    pub async fn verify(&self, request: VerificationRequest) -> DomainResult<VerifiedAttendance> {
        let registration = match request.target {
            VerificationTarget::Registration(id) => self
                .repository
                .find_by_id(id)
                .await?
                .ok_or(AttendanceError::RegistrationNotFound),
            VerificationTarget::Token => self
                .repository
                .find_by_token(&request.token)
                .await?
                .ok_or(AttendanceError::InvalidToken),
        };
        let registration = match registration {
            Ok(registration) => registration,
            Err(rejection) => return Err(self.reject(None, request.event_id, rejection)),
        };

        let now = self.clock.now();
        if let Err(rejection) =
            check_preconditions(&registration, &request.token, request.event_id, now)
        {
            return Err(self.reject(Some(registration.id), request.event_id, rejection));
        }

        let method = request.method.unwrap_or(VerificationMethod::Token);
        self.complete(
            &registration,
            now,
            method,
            Some(request.token),
            request.provenance,
        )
        .await
    }

    /// Check a participant in without a token
    ///
    /// Only the event and verification-state preconditions apply.
    pub async fn check_in_manually(
        &self,
        registration_id: i64,
        event_id: i64,
        provenance: RequestProvenance,
    ) -> DomainResult<VerifiedAttendance> {
        let registration = self.load(registration_id).await?;

        if !registration.belongs_to_event(event_id) {
            return Err(self.reject(Some(registration_id), event_id, AttendanceError::WrongEvent));
        }
        if registration.is_attendance_verified() {
            return Err(self.reject(
                Some(registration_id),
                event_id,
                AttendanceError::AlreadyVerified,
            ));
        }

        let now = self.clock.now();
        self.complete(
            &registration,
            now,
            VerificationMethod::Manual,
            None,
            provenance,
        )
        .await
    }

    /// Record the participant leaving; `time_out` is set once
    pub async fn check_out(&self, registration_id: i64) -> DomainResult<Attendance> {
        self.load(registration_id).await?;

        let now = self.clock.now();
        match self.repository.record_check_out(registration_id, now).await? {
            CheckOutOutcome::Recorded(attendance) => {
                tracing::info!(
                    registration_id = registration_id,
                    event_id = attendance.event_id,
                    event = "attendance_checked_out",
                    "Participant checked out"
                );
                Ok(attendance)
            }
            CheckOutOutcome::NotCheckedIn => Err(AttendanceError::NotCheckedIn.into()),
            CheckOutOutcome::AlreadyCheckedOut => Err(AttendanceError::AlreadyCheckedOut.into()),
        }
    }

    /// Mark every pending registration of the event absent
    ///
    /// Absent registrations stay unverified and can still be verified later.
    ///
    /// # Returns
    ///
    /// Number of registrations marked absent
    pub async fn mark_absentees(&self, event_id: i64) -> DomainResult<u64> {
        let marked = self
            .repository
            .mark_pending_as_absent(event_id, self.clock.now())
            .await?;

        tracing::info!(
            event_id = event_id,
            marked = marked,
            event = "attendance_absentees_marked",
            "Pending registrations marked absent"
        );
        Ok(marked)
    }

    /// Attendance counts for an event
    pub async fn summary(&self, event_id: i64) -> DomainResult<AttendanceSummary> {
        self.repository.summarize_event(event_id).await
    }

    async fn load(&self, registration_id: i64) -> DomainResult<Registration> {
        self.repository
            .find_by_id(registration_id)
            .await?
            .ok_or_else(|| AttendanceError::RegistrationNotFound.into())
    }

    async fn complete(
        &self,
        registration: &Registration,
        now: DateTime<Utc>,
        method: VerificationMethod,
        expected_token: Option<String>,
        provenance: RequestProvenance,
    ) -> DomainResult<VerifiedAttendance> {
        let completion = VerificationCompletion {
            registration_id: registration.id,
            verified_at: now,
            method,
            expected_token,
            attendance: Attendance::for_registration(registration, now, provenance),
        };

        match self.repository.complete_verification(completion).await? {
            Some(verified) => {
                tracing::info!(
                    registration_id = registration.id,
                    event_id = registration.event_id,
                    participant_id = registration.participant_id,
                    method = %method,
                    event = "attendance_verified",
                    "Attendance verified"
                );
                Ok(verified)
            }
            None => {
                // Lost a race: either another request verified first or the
                // token was replaced after it was checked
                let rejection = match self.repository.find_by_id(registration.id).await? {
                    Some(current) if !current.is_attendance_verified() => {
                        AttendanceError::InvalidToken
                    }
                    _ => AttendanceError::AlreadyVerified,
                };
                Err(self.reject(Some(registration.id), registration.event_id, rejection))
            }
        }
    }

    fn reject(
        &self,
        registration_id: Option<i64>,
        event_id: i64,
        rejection: AttendanceError,
    ) -> DomainError {
        tracing::warn!(
            registration_id = ?registration_id,
            event_id = event_id,
            reason = rejection.code(),
            event = "attendance_verification_rejected",
            "Attendance verification rejected"
        );
        rejection.into()
    }
}
