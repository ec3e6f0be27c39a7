//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `attendance` - Attendance token lifetime and issuance limits
//! - `database` - Database connection, pool, and store backend selection
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration

pub mod attendance;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use attendance::AttendanceConfig;
pub use database::{DatabaseConfig, StoreBackend};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Attendance token configuration
    #[serde(default)]
    pub attendance: AttendanceConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            attendance: AttendanceConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::new("127.0.0.1", 8080),
            database: DatabaseConfig::new("mysql://localhost:3306/eventhub_dev")
                .with_backend(StoreBackend::Memory),
            attendance: AttendanceConfig::default(),
            cors: CorsConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            database: DatabaseConfig::new("mysql://prod-db:3306/eventhub")
                .with_max_connections(50),
            attendance: AttendanceConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    ///
    /// The environment preset supplies defaults; explicit variables such as
    /// `DATABASE_URL` or `SERVER_PORT` override them.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let preset = match environment {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        Self {
            environment,
            server: ServerConfig::from_env_or(preset.server),
            database: DatabaseConfig::from_env_or(preset.database),
            attendance: AttendanceConfig::from_env(),
            cors: preset.cors,
            logging: LoggingConfig::from_env_or(preset.logging),
        }
    }
}
