//! # Eventhub Core
//!
//! Core business logic and domain layer for event attendance.
//! This crate contains the registration and attendance entities, the attendance
//! token services (issuer, verifier, certificate gate), repository interfaces,
//! and the error types that form the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
