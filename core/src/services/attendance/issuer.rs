//! Attendance token issuance

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ev_shared::validation::mask_token;

use crate::domain::entities::Registration;
use crate::errors::{AttendanceError, DomainError, DomainResult};
use crate::repositories::{AssignTokenOutcome, RegistrationRepository, TokenAssignment};

use super::config::AttendanceServiceConfig;
use super::providers::{format_token, Clock, TokenSource};

/// Issues unique 10-digit attendance tokens to registrations
pub struct TokenIssuer<R: RegistrationRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenSource>,
    config: AttendanceServiceConfig,
}

impl<R: RegistrationRepository> TokenIssuer<R> {
    /// Create a new token issuer
    ///
    /// # Arguments
    ///
    /// * `repository` - Registration store; enforces token uniqueness
    /// * `clock` - Source of `token_generated_at`
    /// * `tokens` - Uniform random source for token values
    /// * `config` - Token lifetime and attempt bound
    pub fn new(
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenSource>,
        config: AttendanceServiceConfig,
    ) -> Self {
        Self {
            repository,
            clock,
            tokens,
            config,
        }
    }

    /// Issue a fresh token to an unverified registration
    ///
    /// Any previous token is replaced and stops being accepted. The
    /// registration returns to `pending` with method `token`.
    ///
    /// # Returns
    ///
    /// * `Ok(Registration)` - The registration holding its new token
    /// * `Err(AttendanceError::RegistrationNotFound)` - Unknown registration
    /// * `Err(AttendanceError::AlreadyVerified)` - Verified registrations keep their token
    /// * `Err(AttendanceError::TokenSpaceExhausted)` - Every draw collided
    /// * `Err(DomainError::StoreUnavailable)` - Store failure, not retried
    /// * `Err(DomainError::Internal)` - Configured token lifetime out of range
    pub async fn generate(&self, registration_id: i64) -> DomainResult<Registration> {
        let registration = self.load(registration_id).await?;
        if registration.is_attendance_verified() {
            return Err(AttendanceError::AlreadyVerified.into());
        }
        self.issue(registration_id).await
    }

    /// Persist a new registration and issue its first token
    ///
    /// A registration that arrives with a token keeps it. If issuance fails
    /// the registration stays stored without a token and `ensure_token` can
    /// be retried.
    pub async fn register(&self, registration: Registration) -> DomainResult<Registration> {
        let created = self.repository.create(registration).await?;
        tracing::info!(
            registration_id = created.id,
            event_id = created.event_id,
            event = "registration_created",
            "Registration persisted"
        );
        self.ensure_token(created.id).await
    }

    /// Make sure the registration holds a token, issuing one if it has none
    ///
    /// Called after a registration is first persisted and again before the
    /// event; a registration that already has a token is returned unchanged.
    pub async fn ensure_token(&self, registration_id: i64) -> DomainResult<Registration> {
        let registration = self.load(registration_id).await?;
        if registration.has_token() || registration.is_attendance_verified() {
            tracing::debug!(
                registration_id = registration_id,
                "Registration already holds an attendance token"
            );
            return Ok(registration);
        }
        self.issue(registration_id).await
    }

    /// Replace the token of an unverified registration
    ///
    /// This is the recovery path after `TokenExpired` or a lost token.
    pub async fn reissue(&self, registration_id: i64) -> DomainResult<Registration> {
        let previous = self.load(registration_id).await?;
        if previous.is_attendance_verified() {
            return Err(AttendanceError::AlreadyVerified.into());
        }

        let registration = self.issue(registration_id).await?;
        tracing::info!(
            registration_id = registration_id,
            had_token = previous.has_token(),
            previous_expired = previous.is_token_expired_at(self.clock.now()),
            event = "attendance_token_reissued",
            "Attendance token replaced"
        );
        Ok(registration)
    }

    async fn load(&self, registration_id: i64) -> DomainResult<Registration> {
        self.repository
            .find_by_id(registration_id)
            .await?
            .ok_or_else(|| AttendanceError::RegistrationNotFound.into())
    }

    /// Expiry of a token issued at `now`
    fn expiry_from(&self, now: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
        self.config
            .token_ttl()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                tracing::error!(
                    token_ttl_hours = self.config.token_ttl_hours,
                    "Attendance token lifetime out of range"
                );
                DomainError::Internal {
                    message: format!(
                        "Attendance token lifetime of {} hours is out of range",
                        self.config.token_ttl_hours
                    ),
                }
            })
    }

    /// Draw, check, and write until a unique token sticks or attempts run out
    async fn issue(&self, registration_id: i64) -> DomainResult<Registration> {
        let attempts = self.config.attempts();

        for attempt in 1..=attempts {
            let token = format_token(self.tokens.draw());

            if self.repository.token_exists(&token).await? {
                tracing::warn!(
                    registration_id = registration_id,
                    attempt = attempt,
                    event = "attendance_token_collision",
                    "Drawn attendance token already in use"
                );
                continue;
            }

            let now = self.clock.now();
            let assignment = TokenAssignment {
                token,
                generated_at: now,
                expires_at: Some(self.expiry_from(now)?),
            };

            match self.repository.assign_token(registration_id, assignment).await? {
                AssignTokenOutcome::Assigned(registration) => {
                    tracing::info!(
                        registration_id = registration_id,
                        event_id = registration.event_id,
                        token = %registration
                            .attendance_token
                            .as_deref()
                            .map(mask_token)
                            .unwrap_or_default(),
                        attempt = attempt,
                        event = "attendance_token_issued",
                        "Attendance token issued"
                    );
                    return Ok(registration);
                }
                AssignTokenOutcome::Conflict => {
                    // Another issuer stored the same value between check and write
                    tracing::warn!(
                        registration_id = registration_id,
                        attempt = attempt,
                        event = "attendance_token_collision",
                        "Attendance token rejected by uniqueness constraint"
                    );
                }
                AssignTokenOutcome::AlreadyVerified => {
                    return Err(AttendanceError::AlreadyVerified.into());
                }
                AssignTokenOutcome::NotFound => {
                    return Err(AttendanceError::RegistrationNotFound.into());
                }
            }
        }

        tracing::error!(
            registration_id = registration_id,
            attempts = attempts,
            event = "attendance_token_space_exhausted",
            "Could not allocate a unique attendance token"
        );
        Err(AttendanceError::TokenSpaceExhausted { attempts }.into())
    }
}
