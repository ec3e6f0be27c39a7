pub mod cors;
pub mod provenance;

pub use cors::*;
pub use provenance::*;
