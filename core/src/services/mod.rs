//! Business services containing domain logic and use cases.

pub mod attendance;

// Re-export commonly used types
pub use attendance::{
    AttendanceServiceConfig, AttendanceServices, AttendanceVerifier, CertificateGate, Clock,
    FixedClock, OsRngTokenSource, SequenceTokenSource, SystemClock, TokenIssuer, TokenSource,
    VerificationRequest, VerificationTarget,
};
