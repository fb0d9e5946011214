//! Circuit breaker implementation.
//!
//! Isolates one upstream dependency: fails fast while it is unhealthy
//! and probes for recovery after a reset timeout.

use crate::breaker::config::BreakerConfig;
use crate::breaker::metrics::{CallMetrics, MetricsSnapshot};
use crate::breaker::state::BreakerState;
use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Dispatch policy for a single call.
///
/// `BypassOnOpen` lets emergency traffic through an OPEN circuit. A
/// bypassed call records its outcome but never drives a transition out
/// of OPEN or HALF_OPEN; it is an escape hatch, not a recovery probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallPolicy {
    /// Respect the breaker state; rejected while OPEN.
    Normal,
    /// Execute regardless of state.
    BypassOnOpen,
}

impl CallPolicy {
    /// Whether this policy ignores an OPEN circuit.
    pub fn bypasses_open(&self) -> bool {
        matches!(self, CallPolicy::BypassOnOpen)
    }
}

/// Derived health view of a breaker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    /// CLOSED with a failure rate under 10%
    pub healthy: bool,
    /// Current state
    pub state: BreakerState,
    /// Failure percentage in [0, 100]
    pub failure_rate: f64,
}

struct Inner {
    state: BreakerState,
    opened_at: Option<Instant>,
    metrics: CallMetrics,
}

/// Per-dependency fault isolator.
///
/// The breaker owns its state machine and rolling call metrics. State
/// transitions are evaluated lazily on access; there is no background
/// timer. Interior mutability keeps the API `&self` so one breaker can
/// be shared across tasks.
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    inner: RwLock<Inner>,
}

impl CircuitBreaker {
    /// Create a breaker guarding the named dependency.
    pub fn new(name: &str, config: BreakerConfig) -> Self {
        let metrics = CallMetrics::new(config.max_samples);
        Self {
            name: name.to_string(),
            config,
            inner: RwLock::new(Inner {
                state: BreakerState::Closed,
                opened_at: None,
                metrics,
            }),
        }
    }

    /// Create a breaker with default configuration.
    pub fn with_defaults(name: &str) -> Self {
        Self::new(name, BreakerConfig::default())
    }

    /// Name of the guarded dependency.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration in effect.
    pub fn config(&self) -> &BreakerConfig {
        &self.config
    }

    /// Current state, applying the lazy OPEN to HALF_OPEN transition.
    pub fn state(&self) -> BreakerState {
        let mut inner = self.lock_write();
        self.refresh_state(&mut inner);
        inner.state
    }

    /// Execute `op` under this breaker.
    ///
    /// The operation races against `timeout` (falling back to the
    /// configured call timeout); a timeout is recorded identically to
    /// any other failure. While OPEN, `Normal` calls are rejected with
    /// [`Error::BreakerOpen`] without invoking `op`; `BypassOnOpen`
    /// calls always execute. Errors from `op` are recorded and
    /// re-thrown to the caller.
    pub async fn call<F, Fut, T>(
        &self,
        op: F,
        policy: CallPolicy,
        timeout: Option<Duration>,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let entry_state = self.state();
        if entry_state.is_open() && !policy.bypasses_open() {
            return Err(Error::BreakerOpen {
                provider: self.name.clone(),
            });
        }

        let limit = timeout.unwrap_or(self.config.call_timeout);
        let started = Instant::now();

        match tokio::time::timeout(limit, op()).await {
            Ok(Ok(value)) => {
                self.on_success(started.elapsed().as_millis() as u64, policy);
                Ok(value)
            }
            Ok(Err(err)) => {
                self.on_failure(started.elapsed().as_millis() as u64, policy);
                Err(err)
            }
            Err(_) => {
                let waited_ms = limit.as_millis() as u64;
                self.on_failure(waited_ms, policy);
                Err(Error::Timeout {
                    provider: self.name.clone(),
                    waited_ms,
                })
            }
        }
    }

    /// Snapshot of requests, failures, latency stats and state.
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let mut inner = self.lock_write();
        self.refresh_state(&mut inner);
        inner.metrics.snapshot(inner.state)
    }

    /// Derived health view: CLOSED and failure rate under 10%.
    pub fn get_health_status(&self) -> HealthStatus {
        let snapshot = self.get_metrics();
        HealthStatus {
            healthy: snapshot.state.is_closed() && snapshot.failure_rate < 10.0,
            state: snapshot.state,
            failure_rate: snapshot.failure_rate,
        }
    }

    /// Force the circuit OPEN, starting the reset timer from now.
    pub fn force_open(&self) {
        let mut inner = self.lock_write();
        inner.state = BreakerState::Open;
        inner.opened_at = Some(Instant::now());
        tracing::warn!(breaker = %self.name, "circuit forced open");
    }

    /// Force the circuit CLOSED without touching metrics.
    pub fn force_close(&self) {
        let mut inner = self.lock_write();
        inner.state = BreakerState::Closed;
        inner.opened_at = None;
        tracing::info!(breaker = %self.name, "circuit forced closed");
    }

    /// Reset state and metrics to a fresh breaker.
    pub fn reset(&self) {
        let mut inner = self.lock_write();
        inner.state = BreakerState::Closed;
        inner.opened_at = None;
        inner.metrics = CallMetrics::new(self.config.max_samples);
    }

    fn refresh_state(&self, inner: &mut Inner) {
        if inner.state.is_open() {
            if let Some(opened_at) = inner.opened_at {
                if opened_at.elapsed() >= self.config.reset_timeout {
                    inner.state = BreakerState::HalfOpen;
                    tracing::info!(
                        breaker = %self.name,
                        "reset timeout elapsed, probing for recovery"
                    );
                }
            }
        }
    }

    fn on_success(&self, response_ms: u64, policy: CallPolicy) {
        let mut inner = self.lock_write();
        inner.metrics.record_success(response_ms);

        if inner.state.is_half_open() && !policy.bypasses_open() {
            inner.state = BreakerState::Closed;
            inner.opened_at = None;
            inner.metrics.reset_counters();
            tracing::info!(breaker = %self.name, "probe succeeded, circuit closed");
        }
    }

    fn on_failure(&self, response_ms: u64, policy: CallPolicy) {
        let mut inner = self.lock_write();
        inner.metrics.record_failure(response_ms);

        match inner.state {
            BreakerState::Closed => {
                if inner.metrics.failures() >= self.config.failure_threshold as u64 {
                    inner.state = BreakerState::Open;
                    inner.opened_at = Some(Instant::now());
                    tracing::warn!(
                        breaker = %self.name,
                        failures = inner.metrics.failures(),
                        "failure threshold reached, circuit opened"
                    );
                }
            }
            BreakerState::HalfOpen => {
                if !policy.bypasses_open() {
                    inner.state = BreakerState::Open;
                    inner.opened_at = Some(Instant::now());
                    tracing::warn!(breaker = %self.name, "probe failed, circuit reopened");
                }
            }
            // Only bypass traffic executes while open; no transition.
            BreakerState::Open => {}
        }
    }

    fn lock_write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
