//! Rolling call metrics for circuit breakers.

use crate::breaker::state::BreakerState;
use crate::core::Timestamp;
use serde::{Deserialize, Serialize};

/// Call accounting owned by a single circuit breaker.
///
/// Requests and failures are cumulative since the last reset; response
/// times are a fixed-size rolling window with the oldest sample evicted.
#[derive(Clone, Debug)]
pub struct CallMetrics {
    /// Calls attempted since the last reset
    requests: u64,
    /// Failed calls since the last reset
    failures: u64,
    /// Rolling response-time samples (ms)
    response_times: Vec<u64>,
    /// Ring capacity
    max_samples: usize,
    /// When the most recent failure was recorded
    last_failure_time: Option<Timestamp>,
}

impl CallMetrics {
    /// Create empty metrics with the given ring capacity.
    pub fn new(max_samples: usize) -> Self {
        Self {
            requests: 0,
            failures: 0,
            response_times: Vec::new(),
            max_samples,
            last_failure_time: None,
        }
    }

    /// Record a successful call and its observed duration.
    pub fn record_success(&mut self, response_ms: u64) {
        self.requests += 1;
        self.push_sample(response_ms);
    }

    /// Record a failed call and its observed duration.
    pub fn record_failure(&mut self, response_ms: u64) {
        self.requests += 1;
        self.failures += 1;
        self.last_failure_time = Some(crate::core::now());
        self.push_sample(response_ms);
    }

    fn push_sample(&mut self, response_ms: u64) {
        self.response_times.push(response_ms);
        if self.response_times.len() > self.max_samples {
            self.response_times.remove(0);
        }
    }

    /// Reset the cumulative counters. Samples are kept.
    pub fn reset_counters(&mut self) {
        self.requests = 0;
        self.failures = 0;
    }

    /// Calls attempted since the last reset.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Failed calls since the last reset.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Failure percentage in [0, 100]; 0 when no calls were made.
    pub fn failure_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.failures as f64 / self.requests as f64 * 100.0
        }
    }

    /// Average response time over the rolling window; 0 when empty.
    pub fn average_response_ms(&self) -> f64 {
        if self.response_times.is_empty() {
            0.0
        } else {
            self.response_times.iter().sum::<u64>() as f64 / self.response_times.len() as f64
        }
    }

    /// Fastest sample in the rolling window.
    pub fn min_response_ms(&self) -> Option<u64> {
        self.response_times.iter().copied().min()
    }

    /// Slowest sample in the rolling window.
    pub fn max_response_ms(&self) -> Option<u64> {
        self.response_times.iter().copied().max()
    }

    /// Number of samples currently held.
    pub fn sample_count(&self) -> usize {
        self.response_times.len()
    }

    /// When the most recent failure was recorded.
    pub fn last_failure_time(&self) -> Option<Timestamp> {
        self.last_failure_time
    }

    /// Build a serializable snapshot tagged with the breaker state.
    pub fn snapshot(&self, state: BreakerState) -> MetricsSnapshot {
        MetricsSnapshot {
            state,
            requests: self.requests,
            failures: self.failures,
            failure_rate: self.failure_rate(),
            average_response_ms: self.average_response_ms(),
            min_response_ms: self.min_response_ms(),
            max_response_ms: self.max_response_ms(),
            sample_count: self.sample_count(),
            last_failure_time: self.last_failure_time,
        }
    }
}

/// Point-in-time view of a breaker's metrics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Breaker state at snapshot time
    pub state: BreakerState,
    /// Calls attempted since the last reset
    pub requests: u64,
    /// Failed calls since the last reset
    pub failures: u64,
    /// Failure percentage in [0, 100]
    pub failure_rate: f64,
    /// Average response time over the rolling window (ms)
    pub average_response_ms: f64,
    /// Fastest rolling-window sample (ms)
    pub min_response_ms: Option<u64>,
    /// Slowest rolling-window sample (ms)
    pub max_response_ms: Option<u64>,
    /// Samples currently held
    pub sample_count: usize,
    /// When the most recent failure was recorded
    pub last_failure_time: Option<Timestamp>,
}
