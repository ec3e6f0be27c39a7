pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;
pub mod types;

pub use memory::InMemoryRegistrationRepository;
pub use r#trait::RegistrationRepository;
pub use types::{
    AssignTokenOutcome, CheckOutOutcome, TokenAssignment, VerificationCompletion,
    VerifiedAttendance,
};

#[cfg(test)]
mod tests;
