//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for extraction requests.
//! It stops calling the extraction service for a while once requests have
//! failed repeatedly, so the planner fails fast instead of waiting on timeouts.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::extraction_config::RecoveryConfig;

/// Circuit breaker for extraction requests
///
/// # State Machine
///
/// - **Closed**: Normal operation, requests pass through
/// - **Open**: Failure threshold exceeded, requests fail fast
/// - **Half-Open**: Reset timeout elapsed, the next request is let through
///
/// # Configuration
///
/// Uses `RecoveryConfig` for:
/// - `circuit_breaker_threshold`: Failures before opening (default: 5)
/// - `circuit_breaker_reset_secs`: Time before attempting reset (default: 60s)
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_count: Mutex<u32>,
    last_failure_time: Mutex<Option<Instant>>,
    config: RecoveryConfig,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use madplan::circuit_breaker::CircuitBreaker;
    /// use madplan::extraction_config::RecoveryConfig;
    ///
    /// let circuit_breaker = CircuitBreaker::new(RecoveryConfig::default());
    /// assert!(!circuit_breaker.is_open());
    /// ```
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            failure_count: Mutex::new(0),
            last_failure_time: Mutex::new(None),
            config,
        }
    }

    /// Check if circuit breaker is open (blocking requests)
    ///
    /// Returns `true` while the failure count is at or above the threshold
    /// and the reset timeout has not elapsed. Once it has, the breaker closes
    /// again.
    pub fn is_open(&self) -> bool {
        let failure_count = *lock(&self.failure_count);
        let last_failure = *lock(&self.last_failure_time);

        if failure_count >= self.config.circuit_breaker_threshold {
            if let Some(last_time) = last_failure {
                let elapsed = last_time.elapsed();
                if elapsed < Duration::from_secs(self.config.circuit_breaker_reset_secs) {
                    return true;
                }
                tracing::info!(failure_count, "Circuit breaker reset after cool-down");
                self.record_success();
            }
        }
        false
    }

    /// Record a failed request
    pub fn record_failure(&self) {
        let mut failure_count = lock(&self.failure_count);
        *failure_count += 1;
        *lock(&self.last_failure_time) = Some(Instant::now());

        if *failure_count == self.config.circuit_breaker_threshold {
            tracing::warn!(
                failure_count = *failure_count,
                reset_secs = self.config.circuit_breaker_reset_secs,
                "Circuit breaker opened"
            );
        }
    }

    /// Record a successful request, closing the breaker
    pub fn record_success(&self) {
        *lock(&self.failure_count) = 0;
        *lock(&self.last_failure_time) = None;
    }

    /// Current consecutive failure count
    pub fn failure_count(&self) -> u32 {
        *lock(&self.failure_count)
    }
}
