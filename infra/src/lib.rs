//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Eventhub attendance
//! server. It provides the MySQL-backed implementation of the core
//! `RegistrationRepository` and the connection pool it runs on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: MySQL connection pool, schema bootstrap and repository
//!   implementations using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use ev_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Configuration module for infrastructure services
pub mod config {
    //! Configuration for infrastructure services, loaded through the shared
    //! config types
    pub use ev_shared::config::DatabaseConfig;

    /// Load the database configuration, reading `.env` first if present
    pub fn load_database_config() -> DatabaseConfig {
        dotenvy::dotenv().ok();
        DatabaseConfig::from_env()
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(e) => DomainError::store(e),
            InfrastructureError::Config(message) => DomainError::Internal { message },
        }
    }
}
