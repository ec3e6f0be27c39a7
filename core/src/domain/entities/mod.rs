//! Domain entities representing core business objects.

pub mod attendance;
pub mod registration;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use attendance::{Attendance, RequestProvenance};
pub use registration::{Registration, DEFAULT_TOKEN_TTL_HOURS};
