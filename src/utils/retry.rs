//! Restart utilities for long-running operations
//!
//! The Discord gateway client is expected to run forever. When it stops with an
//! error it is restarted here after an exponentially growing delay, capped so a
//! persistent outage settles into a steady reconnect cadence.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for restart behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: u64,

    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            max_delay_ms: 60_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a restart configuration with custom delays
    pub fn with_delays(base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            base_delay_ms,
            max_delay_ms,
            backoff_multiplier: 2.0,
        }
    }

    /// Calculate delay for a given attempt using exponential backoff
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let delay_ms = if attempt == 0 {
            0
        } else {
            let exponential = self.base_delay_ms as f64
                * self
                    .backoff_multiplier
                    .powi(attempt.saturating_sub(1).min(31) as i32);
            (exponential as u64).min(self.max_delay_ms)
        };

        Duration::from_millis(delay_ms)
    }
}

/// Run `operation` until it returns `Ok`, restarting it after each error
///
/// There is no attempt limit; callers stop the loop by dropping the returned
/// future (for example from a `tokio::select!` against a shutdown signal).
pub async fn with_restart<T, E, F, Fut>(config: &RetryConfig, mut operation: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 0;

    loop {
        if attempt > 0 {
            let delay = config.calculate_delay(attempt);
            debug!(
                attempt = attempt,
                delay_ms = delay.as_millis() as u64,
                "Restarting operation after delay"
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(result) => return result,
            Err(e) => {
                warn!(attempt = attempt, error = %e, "Operation stopped with error");
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
