//! Time and randomness providers for the attendance services

use chrono::{DateTime, Duration, Utc};
use ev_shared::validation::ATTENDANCE_TOKEN_LENGTH;
use rand::{rngs::OsRng, Rng};
use std::collections::VecDeque;
use std::sync::{Mutex, RwLock};

/// Number of distinct attendance tokens (10^10)
pub const TOKEN_SPACE: u64 = 10_000_000_000;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a settable instant
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Source of uniformly distributed token values in `0..TOKEN_SPACE`
pub trait TokenSource: Send + Sync {
    fn draw(&self) -> u64;
}

/// Cryptographically secure token source backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngTokenSource;

impl TokenSource for OsRngTokenSource {
    fn draw(&self) -> u64 {
        OsRng.gen_range(0..TOKEN_SPACE)
    }
}

/// Scripted token source
///
/// Yields the given values in order, then repeats the last one forever.
#[derive(Debug)]
pub struct SequenceTokenSource {
    values: Mutex<VecDeque<u64>>,
    last: Mutex<u64>,
}

impl SequenceTokenSource {
    pub fn new(values: impl IntoIterator<Item = u64>) -> Self {
        Self {
            values: Mutex::new(values.into_iter().collect()),
            last: Mutex::new(0),
        }
    }
}

impl TokenSource for SequenceTokenSource {
    fn draw(&self) -> u64 {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = values.pop_front() {
            *last = next;
        }
        *last
    }
}

/// Render a drawn value as a zero-padded 10-digit token
pub fn format_token(value: u64) -> String {
    format!(
        "{:0width$}",
        value % TOKEN_SPACE,
        width = ATTENDANCE_TOKEN_LENGTH
    )
}
