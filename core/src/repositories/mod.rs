pub mod registration;

pub use registration::{
    AssignTokenOutcome, CheckOutOutcome, InMemoryRegistrationRepository,
    RegistrationRepository, TokenAssignment, VerificationCompletion, VerifiedAttendance,
};
