//! Shared utilities and common types for the Eventhub server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error codes and response structures
//! - Utility functions (attendance token validation and masking)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AttendanceConfig, CorsConfig, DatabaseConfig, Environment, LogFormat,
    LoggingConfig, ServerConfig, StoreBackend,
};
pub use errors::error_codes;
pub use types::{ErrorResponse, HealthResponse, HealthStatus, ResponseStatus, ServiceHealth};
pub use utils::validation;
