//! Reconnect backoff policy for the stream client.

use std::time::Duration;

/// Configuration for the reconnect backoff policy.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of reconnect attempts per outage. 0 disables
    /// reconnection entirely.
    pub max_attempts: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
    /// Backoff multiplier (e.g., 2.0 for exponential).
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff_ms: 1000,
            max_backoff_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Capped exponential backoff schedule.
///
/// A successful reconnect resets the schedule so a later outage starts from
/// the initial delay again.
#[derive(Debug)]
pub struct Backoff {
    config: ReconnectConfig,
    attempt: u32,
    next_ms: u64,
}

impl Backoff {
    pub fn new(config: ReconnectConfig) -> Self {
        let next_ms = config.initial_backoff_ms;
        Self {
            config,
            attempt: 0,
            next_ms,
        }
    }

    /// Delay to wait before the next attempt, or `None` once the attempt
    /// limit is reached.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.config.max_attempts {
            return None;
        }
        self.attempt += 1;
        let delay = Duration::from_millis(self.next_ms);
        let grown = (self.next_ms as f64 * self.config.backoff_multiplier) as u64;
        self.next_ms = grown.min(self.config.max_backoff_ms);
        Some(delay)
    }

    pub fn attempts_used(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
        self.next_ms = self.config.initial_backoff_ms;
    }
}
