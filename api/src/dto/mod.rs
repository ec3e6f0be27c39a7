//! Request and response bodies

pub mod attendance_dto;

pub use attendance_dto::*;
pub use ev_shared::types::response::{ErrorResponse, ResponseStatus};
