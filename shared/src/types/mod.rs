//! Type definitions shared by the API and domain layers
//!
//! - `response` - Response envelopes, error bodies, and health checks

pub mod response;

pub use response::{ErrorResponse, HealthResponse, HealthStatus, ResponseStatus, ServiceHealth};
