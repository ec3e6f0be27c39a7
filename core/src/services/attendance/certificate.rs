//! Certificate eligibility gate

use std::sync::Arc;

use crate::domain::entities::Registration;
use crate::errors::{AttendanceError, DomainResult};
use crate::repositories::RegistrationRepository;

use super::providers::Clock;

/// Decides and records certificate issuance
///
/// A registration is eligible exactly when attendance is verified and no
/// certificate has been issued yet.
pub struct CertificateGate<R: RegistrationRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: RegistrationRepository> CertificateGate<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn can_receive_certificate(registration: &Registration) -> bool {
        registration.can_receive_certificate()
    }

    /// Eligibility of a stored registration
    pub async fn is_eligible(&self, registration_id: i64) -> DomainResult<bool> {
        let registration = self
            .repository
            .find_by_id(registration_id)
            .await?
            .ok_or(AttendanceError::RegistrationNotFound)?;
        Ok(Self::can_receive_certificate(&registration))
    }

    /// Record that the certificate was issued
    ///
    /// The store update is conditional on eligibility, so of two concurrent
    /// calls only one succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(Registration)` - Updated registration with `has_received_certificate` set
    /// * `Err(AttendanceError::RegistrationNotFound)` - Unknown registration
    /// * `Err(AttendanceError::NotEligibleForCertificate)` - Not verified, or already issued
    pub async fn mark_certificate_received(
        &self,
        registration_id: i64,
    ) -> DomainResult<Registration> {
        let registration = self
            .repository
            .find_by_id(registration_id)
            .await?
            .ok_or(AttendanceError::RegistrationNotFound)?;

        if !Self::can_receive_certificate(&registration) {
            tracing::warn!(
                registration_id = registration_id,
                verified = registration.is_attendance_verified(),
                already_received = registration.has_received_certificate,
                event = "certificate_rejected",
                "Registration not eligible for a certificate"
            );
            return Err(AttendanceError::NotEligibleForCertificate.into());
        }

        let updated = self
            .repository
            .mark_certificate_received(registration_id, self.clock.now())
            .await?
            .ok_or(AttendanceError::NotEligibleForCertificate)?;

        tracing::info!(
            registration_id = registration_id,
            event_id = updated.event_id,
            event = "certificate_marked_received",
            "Certificate marked as received"
        );
        Ok(updated)
    }
}
