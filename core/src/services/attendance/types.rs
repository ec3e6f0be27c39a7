//! Inputs of the verification operations

use crate::domain::entities::RequestProvenance;
use crate::domain::value_objects::VerificationMethod;

/// How the verifier locates the registration being verified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationTarget {
    /// A known registration; the presented token is compared against its token
    Registration(i64),
    /// Look the registration up by the presented token
    Token,
}

/// A participant's verification attempt
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub target: VerificationTarget,
    /// Token as presented, compared byte for byte
    pub token: String,
    /// Event the participant claims to attend
    pub event_id: i64,
    pub provenance: RequestProvenance,
    /// Method recorded on success; `Token` when absent
    pub method: Option<VerificationMethod>,
}

impl VerificationRequest {
    /// Token lookup request, the shape of the public verify endpoint
    pub fn by_token(token: impl Into<String>, event_id: i64, provenance: RequestProvenance) -> Self {
        Self {
            target: VerificationTarget::Token,
            token: token.into(),
            event_id,
            provenance,
            method: None,
        }
    }

    /// Request against a known registration
    pub fn for_registration(
        registration_id: i64,
        token: impl Into<String>,
        event_id: i64,
        provenance: RequestProvenance,
    ) -> Self {
        Self {
            target: VerificationTarget::Registration(registration_id),
            token: token.into(),
            event_id,
            provenance,
            method: None,
        }
    }

    pub fn with_method(mut self, method: VerificationMethod) -> Self {
        self.method = Some(method);
        self
    }
}
