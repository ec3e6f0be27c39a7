//! Configuration for the attendance services

use chrono::Duration;
use ev_shared::AttendanceConfig;

use crate::domain::entities::DEFAULT_TOKEN_TTL_HOURS;

/// Default number of token draws before issuance gives up
pub const DEFAULT_MAX_ISSUE_ATTEMPTS: u32 = 10;

/// Configuration for the attendance services
#[derive(Debug, Clone)]
pub struct AttendanceServiceConfig {
    /// Hours a freshly issued token stays valid
    pub token_ttl_hours: i64,
    /// Token draws attempted before failing with `TokenSpaceExhausted`
    pub max_issue_attempts: u32,
}

impl Default for AttendanceServiceConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            max_issue_attempts: DEFAULT_MAX_ISSUE_ATTEMPTS,
        }
    }
}

impl AttendanceServiceConfig {
    /// Token lifetime as a duration; `None` when the hours do not fit one
    pub fn token_ttl(&self) -> Option<Duration> {
        Duration::try_hours(self.token_ttl_hours)
    }

    /// Attempt bound, never below one
    pub fn attempts(&self) -> u32 {
        self.max_issue_attempts.max(1)
    }

    pub fn with_max_issue_attempts(mut self, attempts: u32) -> Self {
        self.max_issue_attempts = attempts;
        self
    }

    pub fn with_token_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_hours = hours;
        self
    }
}

impl From<&AttendanceConfig> for AttendanceServiceConfig {
    fn from(config: &AttendanceConfig) -> Self {
        Self {
            token_ttl_hours: config.token_ttl_hours,
            max_issue_attempts: config.max_token_attempts,
        }
    }
}
