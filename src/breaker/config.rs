//! Circuit breaker configuration.

use std::time::Duration;

/// Configuration for a circuit breaker.
#[derive(Clone, Debug)]
pub struct BreakerConfig {
    /// Cumulative failures while CLOSED before the circuit opens.
    pub failure_threshold: u32,

    /// How long the circuit stays OPEN before relaxing to HALF_OPEN.
    pub reset_timeout: Duration,

    /// Default deadline for a single call.
    pub call_timeout: Duration,

    /// Nominal observation window reported alongside metrics.
    ///
    /// The open decision intentionally uses the cumulative failure
    /// count since the last reset, not a count scoped to this window.
    pub monitoring_window: Duration,

    /// Capacity of the rolling response-time ring.
    pub max_samples: usize,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            call_timeout: Duration::from_secs(3),
            monitoring_window: Duration::from_secs(60),
            max_samples: 100,
        }
    }
}

impl BreakerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure threshold.
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Set the reset timeout.
    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    /// Set the per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the monitoring window.
    pub fn with_monitoring_window(mut self, window: Duration) -> Self {
        self.monitoring_window = window;
        self
    }

    /// Set the rolling sample capacity.
    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max;
        self
    }
}
