//! Test fixtures for the attendance services

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::domain::entities::{Attendance, Registration};
use crate::domain::value_objects::AttendanceSummary;
use crate::errors::DomainError;
use crate::repositories::{
    AssignTokenOutcome, CheckOutOutcome, InMemoryRegistrationRepository, RegistrationRepository,
    TokenAssignment, VerificationCompletion, VerifiedAttendance,
};
use crate::services::attendance::{
    AttendanceServiceConfig, AttendanceServices, FixedClock, SequenceTokenSource,
};

pub const EVENT_ID: i64 = 10;
pub const OTHER_EVENT_ID: i64 = 20;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

pub fn registration(id: i64, event_id: i64) -> Registration {
    Registration::new(id, event_id, id * 100, format!("REG-{:04}", id), start_time())
}

/// Services over an in-memory store with a frozen clock and scripted tokens
pub struct Fixture<R: RegistrationRepository = InMemoryRegistrationRepository> {
    pub repository: Arc<R>,
    pub clock: Arc<FixedClock>,
    pub services: AttendanceServices<R>,
}

pub fn fixture(draws: impl IntoIterator<Item = u64>) -> Fixture {
    fixture_with(InMemoryRegistrationRepository::new(), draws)
}

pub fn fixture_with<R: RegistrationRepository>(
    repository: R,
    draws: impl IntoIterator<Item = u64>,
) -> Fixture<R> {
    fixture_with_config(repository, draws, AttendanceServiceConfig::default())
}

pub fn fixture_with_config<R: RegistrationRepository>(
    repository: R,
    draws: impl IntoIterator<Item = u64>,
    config: AttendanceServiceConfig,
) -> Fixture<R> {
    let repository = Arc::new(repository);
    let clock = Arc::new(FixedClock::new(start_time()));
    let services = AttendanceServices::new(
        repository.clone(),
        clock.clone(),
        Arc::new(SequenceTokenSource::new(draws)),
        config,
    );
    Fixture {
        repository,
        clock,
        services,
    }
}

/// Repository whose `assign_token` reports a uniqueness conflict a fixed
/// number of times before delegating, simulating a concurrent issuer
/// winning the race between the existence check and the write
pub struct ConflictingRepository {
    pub inner: InMemoryRegistrationRepository,
    conflicts_left: AtomicU32,
    pub assign_calls: AtomicU32,
}

impl ConflictingRepository {
    pub fn new(inner: InMemoryRegistrationRepository, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts_left: AtomicU32::new(conflicts),
            assign_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl RegistrationRepository for ConflictingRepository {
    async fn create(&self, registration: Registration) -> Result<Registration, DomainError> {
        self.inner.create(registration).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, DomainError> {
        self.inner.find_by_token(token).await
    }

    async fn assign_token(
        &self,
        registration_id: i64,
        assignment: TokenAssignment,
    ) -> Result<AssignTokenOutcome, DomainError> {
        self.assign_calls.fetch_add(1, Ordering::SeqCst);
        let left = self.conflicts_left.load(Ordering::SeqCst);
        if left > 0 {
            self.conflicts_left.store(left - 1, Ordering::SeqCst);
            return Ok(AssignTokenOutcome::Conflict);
        }
        self.inner.assign_token(registration_id, assignment).await
    }

    async fn complete_verification(
        &self,
        completion: VerificationCompletion,
    ) -> Result<Option<VerifiedAttendance>, DomainError> {
        self.inner.complete_verification(completion).await
    }

    async fn mark_certificate_received(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Registration>, DomainError> {
        self.inner.mark_certificate_received(registration_id, at).await
    }

    async fn find_attendance(
        &self,
        registration_id: i64,
    ) -> Result<Option<Attendance>, DomainError> {
        self.inner.find_attendance(registration_id).await
    }

    async fn record_check_out(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<CheckOutOutcome, DomainError> {
        self.inner.record_check_out(registration_id, at).await
    }

    async fn mark_pending_as_absent(
        &self,
        event_id: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.inner.mark_pending_as_absent(event_id, at).await
    }

    async fn summarize_event(&self, event_id: i64) -> Result<AttendanceSummary, DomainError> {
        self.inner.summarize_event(event_id).await
    }
}

/// Repository that hands out a new token to the looked-up registration right
/// after `find_by_token` reads it, simulating a reissue landing between the
/// verifier's checks and its write
pub struct ReissuingRepository {
    pub inner: InMemoryRegistrationRepository,
    replacement: String,
}

impl ReissuingRepository {
    pub fn new(inner: InMemoryRegistrationRepository, replacement: &str) -> Self {
        Self {
            inner,
            replacement: replacement.to_string(),
        }
    }
}

#[async_trait]
impl RegistrationRepository for ReissuingRepository {
    async fn create(&self, registration: Registration) -> Result<Registration, DomainError> {
        self.inner.create(registration).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, DomainError> {
        let found = self.inner.find_by_token(token).await?;
        if let Some(reg) = &found {
            let assignment = TokenAssignment {
                token: self.replacement.clone(),
                generated_at: start_time(),
                expires_at: Some(start_time() + chrono::Duration::days(1)),
            };
            self.inner.assign_token(reg.id, assignment).await?;
        }
        Ok(found)
    }

    async fn token_exists(&self, token: &str) -> Result<bool, DomainError> {
        self.inner.token_exists(token).await
    }

    async fn assign_token(
        &self,
        registration_id: i64,
        assignment: TokenAssignment,
    ) -> Result<AssignTokenOutcome, DomainError> {
        self.inner.assign_token(registration_id, assignment).await
    }

    async fn complete_verification(
        &self,
        completion: VerificationCompletion,
    ) -> Result<Option<VerifiedAttendance>, DomainError> {
        self.inner.complete_verification(completion).await
    }

    async fn mark_certificate_received(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Registration>, DomainError> {
        self.inner.mark_certificate_received(registration_id, at).await
    }

    async fn find_attendance(
        &self,
        registration_id: i64,
    ) -> Result<Option<Attendance>, DomainError> {
        self.inner.find_attendance(registration_id).await
    }

    async fn record_check_out(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<CheckOutOutcome, DomainError> {
        self.inner.record_check_out(registration_id, at).await
    }

    async fn mark_pending_as_absent(
        &self,
        event_id: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.inner.mark_pending_as_absent(event_id, at).await
    }

    async fn summarize_event(&self, event_id: i64) -> Result<AttendanceSummary, DomainError> {
        self.inner.summarize_event(event_id).await
    }
}
