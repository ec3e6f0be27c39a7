//! In-memory implementation of RegistrationRepository
//!
//! Every mutating operation takes the write lock exactly once, so each
//! check-then-set sequence is atomic with respect to concurrent callers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{Attendance, Registration};
use crate::domain::value_objects::{AttendanceStatus, AttendanceSummary, VerificationMethod};
use crate::errors::DomainError;

use super::r#trait::RegistrationRepository;
use super::types::{
    AssignTokenOutcome, CheckOutOutcome, TokenAssignment, VerificationCompletion,
    VerifiedAttendance,
};

#[derive(Default)]
struct Store {
    registrations: HashMap<i64, Registration>,
    /// token -> registration id
    tokens: HashMap<String, i64>,
    attendances: Vec<Attendance>,
}

/// Registration store held in process memory
#[derive(Clone, Default)]
pub struct InMemoryRegistrationRepository {
    store: Arc<RwLock<Store>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryRegistrationRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a registration as created by the registration workflow
    ///
    /// Fails with a validation error if the id or the token is already taken.
    pub async fn insert(&self, registration: Registration) -> Result<(), DomainError> {
        self.ensure_available()?;
        let mut store = self.store.write().await;

        if store.registrations.contains_key(&registration.id) {
            return Err(DomainError::Validation {
                message: format!("Registration {} already exists", registration.id),
            });
        }
        if let Some(token) = &registration.attendance_token {
            if store.tokens.contains_key(token) {
                return Err(DomainError::Validation {
                    message: "Attendance token already exists".to_string(),
                });
            }
            store.tokens.insert(token.clone(), registration.id);
        }
        store.registrations.insert(registration.id, registration);
        Ok(())
    }

    /// Number of attendance rows referencing a registration
    pub async fn attendance_count(&self, registration_id: i64) -> usize {
        self.store
            .read()
            .await
            .attendances
            .iter()
            .filter(|a| a.registration_id == registration_id)
            .count()
    }

    /// All tokens currently held, for uniqueness checks
    pub async fn tokens(&self) -> Vec<String> {
        self.store
            .read()
            .await
            .registrations
            .values()
            .filter_map(|r| r.attendance_token.clone())
            .collect()
    }

    /// Simulate an unreachable store; every call fails with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DomainError::store("in-memory store marked unavailable"))
        } else {
            Ok(())
        }
    }
}

fn holds_expected_token(registration: &Registration, completion: &VerificationCompletion) -> bool {
    match completion.expected_token.as_deref() {
        Some(expected) => registration.attendance_token.as_deref() == Some(expected),
        None => true,
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn create(&self, registration: Registration) -> Result<Registration, DomainError> {
        self.insert(registration.clone()).await?;
        Ok(registration)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, DomainError> {
        self.ensure_available()?;
        Ok(self.store.read().await.registrations.get(&id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Registration>, DomainError> {
        self.ensure_available()?;
        let store = self.store.read().await;
        Ok(store
            .tokens
            .get(token)
            .and_then(|id| store.registrations.get(id))
            .cloned())
    }

    async fn assign_token(
        &self,
        registration_id: i64,
        assignment: TokenAssignment,
    ) -> Result<AssignTokenOutcome, DomainError> {
        self.ensure_available()?;
        let mut store = self.store.write().await;

        match store.tokens.get(&assignment.token) {
            Some(holder) if *holder != registration_id => return Ok(AssignTokenOutcome::Conflict),
            _ => {}
        }

        let previous = match store.registrations.get_mut(&registration_id) {
            None => return Ok(AssignTokenOutcome::NotFound),
            Some(reg) if reg.is_attendance_verified() => {
                return Ok(AssignTokenOutcome::AlreadyVerified)
            }
            Some(reg) => {
                let previous = reg.attendance_token.replace(assignment.token.clone());
                reg.token_generated_at = Some(assignment.generated_at);
                reg.token_expires_at = assignment.expires_at;
                reg.attendance_status = AttendanceStatus::Pending;
                reg.verification_method = Some(VerificationMethod::Token);
                reg.updated_at = assignment.generated_at;
                previous
            }
        };

        if let Some(old) = previous {
            store.tokens.remove(&old);
        }
        store.tokens.insert(assignment.token, registration_id);

        let updated = store.registrations[&registration_id].clone();
        Ok(AssignTokenOutcome::Assigned(updated))
    }

    async fn complete_verification(
        &self,
        completion: VerificationCompletion,
    ) -> Result<Option<VerifiedAttendance>, DomainError> {
        self.ensure_available()?;
        let mut store = self.store.write().await;

        if store
            .attendances
            .iter()
            .any(|a| a.registration_id == completion.registration_id)
        {
            return Ok(None);
        }

        let registration = match store.registrations.get_mut(&completion.registration_id) {
            Some(reg)
                if !reg.is_attendance_verified() && holds_expected_token(reg, &completion) =>
            {
                reg.attendance_verified_at = Some(completion.verified_at);
                reg.attendance_status = AttendanceStatus::Present;
                reg.verification_method = Some(completion.method);
                reg.updated_at = completion.verified_at;
                reg.clone()
            }
            _ => return Ok(None),
        };

        store.attendances.push(completion.attendance.clone());

        Ok(Some(VerifiedAttendance {
            registration,
            attendance: completion.attendance,
        }))
    }

    async fn mark_certificate_received(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<Registration>, DomainError> {
        self.ensure_available()?;
        let mut store = self.store.write().await;

        match store.registrations.get_mut(&registration_id) {
            Some(reg) if reg.can_receive_certificate() => {
                reg.has_received_certificate = true;
                reg.updated_at = at;
                Ok(Some(reg.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_attendance(
        &self,
        registration_id: i64,
    ) -> Result<Option<Attendance>, DomainError> {
        self.ensure_available()?;
        Ok(self
            .store
            .read()
            .await
            .attendances
            .iter()
            .find(|a| a.registration_id == registration_id)
            .cloned())
    }

    async fn record_check_out(
        &self,
        registration_id: i64,
        at: DateTime<Utc>,
    ) -> Result<CheckOutOutcome, DomainError> {
        self.ensure_available()?;
        let mut store = self.store.write().await;

        match store
            .attendances
            .iter_mut()
            .find(|a| a.registration_id == registration_id)
        {
            None => Ok(CheckOutOutcome::NotCheckedIn),
            Some(attendance) if attendance.time_out.is_some() => {
                Ok(CheckOutOutcome::AlreadyCheckedOut)
            }
            Some(attendance) => {
                attendance.time_out = Some(at);
                Ok(CheckOutOutcome::Recorded(attendance.clone()))
            }
        }
    }

    async fn mark_pending_as_absent(
        &self,
        event_id: i64,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.ensure_available()?;
        let mut store = self.store.write().await;

        let mut updated = 0;
        for reg in store.registrations.values_mut() {
            if reg.event_id == event_id
                && reg.attendance_status == AttendanceStatus::Pending
                && !reg.is_attendance_verified()
            {
                reg.attendance_status = AttendanceStatus::Absent;
                reg.updated_at = at;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn summarize_event(&self, event_id: i64) -> Result<AttendanceSummary, DomainError> {
        self.ensure_available()?;
        let store = self.store.read().await;

        let mut summary = AttendanceSummary {
            event_id,
            ..Default::default()
        };
        for reg in store.registrations.values().filter(|r| r.event_id == event_id) {
            summary.total += 1;
            match reg.attendance_status {
                AttendanceStatus::Pending => summary.pending += 1,
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
            }
            if reg.has_received_certificate {
                summary.certificates_issued += 1;
            }
        }
        Ok(summary)
    }

    async fn token_exists(&self, token: &str) -> Result<bool, DomainError> {
        self.ensure_available()?;
        Ok(self.store.read().await.tokens.contains_key(token))
    }
}
