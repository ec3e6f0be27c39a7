//! Attendance token configuration module

use serde::{Deserialize, Serialize};

/// Longest accepted token lifetime, ten years of hours
pub const MAX_TOKEN_TTL_HOURS: i64 = 87_840;

/// Attendance token lifetime and issuance settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttendanceConfig {
    /// Hours a freshly issued attendance token stays valid
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// Random draws attempted before token issuance gives up
    #[serde(default = "default_max_token_attempts")]
    pub max_token_attempts: u32,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
            max_token_attempts: default_max_token_attempts(),
        }
    }
}

impl AttendanceConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let token_ttl_hours =
            parse_token_ttl_hours(std::env::var("ATTENDANCE_TOKEN_TTL_HOURS").ok().as_deref());
        let max_token_attempts = std::env::var("ATTENDANCE_MAX_TOKEN_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|attempts: &u32| *attempts > 0)
            .unwrap_or_else(default_max_token_attempts);

        Self {
            token_ttl_hours,
            max_token_attempts,
        }
    }

    /// Set the token lifetime in hours
    pub fn with_token_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_hours = hours;
        self
    }
}

/// Parse a token lifetime, falling back to the default when it is missing,
/// malformed, or outside `1..=MAX_TOKEN_TTL_HOURS`
fn parse_token_ttl_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|hours: &i64| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
        .unwrap_or_else(default_token_ttl_hours)
}

fn default_token_ttl_hours() -> i64 {
    24 // 1 day
}

fn default_max_token_attempts() -> u32 {
    10
}
