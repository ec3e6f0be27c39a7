//! Attendance token services
//!
//! This module provides the attendance workflow of a registration:
//! - Token issuance with bounded collision retry
//! - Token verification against ordered preconditions, completed atomically
//! - Organizer check-in, check-out and absentee marking
//! - Certificate eligibility and issuance bookkeeping
//!
//! Time and randomness come from injected [`Clock`] and [`TokenSource`]
//! providers so every path can be driven deterministically.

mod certificate;
mod config;
mod issuer;
mod providers;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::repositories::RegistrationRepository;

pub use certificate::CertificateGate;
pub use config::AttendanceServiceConfig;
pub use issuer::TokenIssuer;
pub use providers::{
    format_token, Clock, FixedClock, OsRngTokenSource, SequenceTokenSource, SystemClock,
    TokenSource, TOKEN_SPACE,
};
pub use types::{VerificationRequest, VerificationTarget};
pub use verifier::{check_preconditions, AttendanceVerifier};

/// The three attendance services wired to one repository and one set of providers
pub struct AttendanceServices<R: RegistrationRepository> {
    pub issuer: TokenIssuer<R>,
    pub verifier: AttendanceVerifier<R>,
    pub certificates: CertificateGate<R>,
}

impl<R: RegistrationRepository> AttendanceServices<R> {
    pub fn new(
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenSource>,
        config: AttendanceServiceConfig,
    ) -> Self {
        Self {
            issuer: TokenIssuer::new(repository.clone(), clock.clone(), tokens, config),
            verifier: AttendanceVerifier::new(repository.clone(), clock.clone()),
            certificates: CertificateGate::new(repository, clock),
        }
    }

    /// Services backed by the system clock and the OS random source
    pub fn with_system_providers(repository: Arc<R>, config: AttendanceServiceConfig) -> Self {
        Self::new(
            repository,
            Arc::new(SystemClock),
            Arc::new(OsRngTokenSource),
            config,
        )
    }
}
