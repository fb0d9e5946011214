//! Tiered failover dispatch.
//!
//! Walks ranked provider tiers in priority order until one answers or
//! every tier is exhausted, within the SLA budget for the traffic
//! class. Per-tier faults are swallowed and recorded; structural
//! failure is always a typed value, never an exception.

use crate::breaker::{BreakerConfig, CallMetrics, CallPolicy, MetricsSnapshot};
use crate::core::{Error, Result};
use crate::failover::provider::{Provider, RequestContext, SupportRequest};
use crate::failover::result::{FailoverEvent, FailoverResult};
use crate::failover::tier::ProviderTier;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Configuration for the failover manager.
#[derive(Clone, Debug)]
pub struct FailoverConfig {
    /// Deadline for a single tier attempt.
    pub call_timeout: Duration,
    /// Failure threshold applied to every tier's breaker.
    pub failure_threshold: u32,
    /// Reset timeout applied to every tier's breaker.
    pub reset_timeout: Duration,
    /// Overall latency budget for the traffic path.
    pub sla_limit: Duration,
    /// Rolling sample capacity for per-provider stats.
    pub max_samples: usize,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(3),
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            sla_limit: Duration::from_secs(2),
            max_samples: 100,
        }
    }
}

impl FailoverConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the breaker failure threshold.
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Set the breaker reset timeout.
    pub fn with_reset_timeout(mut self, timeout: Duration) -> Self {
        self.reset_timeout = timeout;
        self
    }

    /// Set the overall SLA budget.
    pub fn with_sla_limit(mut self, limit: Duration) -> Self {
        self.sla_limit = limit;
        self
    }

    fn breaker_config(&self) -> BreakerConfig {
        BreakerConfig::default()
            .with_failure_threshold(self.failure_threshold)
            .with_reset_timeout(self.reset_timeout)
            .with_call_timeout(self.call_timeout)
            .with_max_samples(self.max_samples)
    }
}

/// Health view of one tier, produced by a concurrent probe sweep.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TierHealth {
    /// Provider name
    pub provider: String,
    /// Tier priority rank
    pub priority: u32,
    /// Probe verdict; probe errors map to unhealthy
    pub healthy: bool,
    /// Probe round-trip time (ms)
    pub response_time_ms: u64,
    /// Breaker state at probe time
    pub breaker_state: crate::breaker::BreakerState,
    /// Probe error, if the probe itself failed
    pub error: Option<String>,
}

/// Aggregated per-provider dispatch statistics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Provider name
    pub provider: String,
    /// Tier priority rank
    pub priority: u32,
    /// Attempts routed to this provider
    pub requests: u64,
    /// Failed attempts
    pub failures: u64,
    /// Success percentage in [0, 100]; 100 with no attempts
    pub success_rate: f64,
    /// Average response time over the rolling window (ms)
    pub average_response_ms: f64,
}

/// Cross-tier metrics with the primary breaker as headline indicator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailoverMetrics {
    /// Requests dispatched through the cascade
    pub total_requests: u64,
    /// Requests answered past tier 1
    pub total_failovers: u64,
    /// Requests no tier could answer
    pub cascade_exhaustions: u64,
    /// Average time to reach the answering tier (ms)
    pub average_failover_time_ms: f64,
    /// Per-provider statistics, in tier order
    pub providers: Vec<ProviderStats>,
    /// Tier-1 breaker snapshot: the system pressure indicator
    pub primary_breaker: MetricsSnapshot,
}

struct CascadeTotals {
    requests: u64,
    failovers: u64,
    failover_times: Vec<u64>,
    exhaustions: u64,
}

/// Orchestrates an ordered set of provider tiers.
///
/// Ordinary traffic respects breaker state to keep timeout budget off
/// known-broken dependencies; crisis traffic ignores it so a stale
/// OPEN reading can never prevent an attempt at every tier.
pub struct FailoverManager {
    tiers: Vec<ProviderTier>,
    config: FailoverConfig,
    stats: Vec<RwLock<CallMetrics>>,
    totals: RwLock<CascadeTotals>,
    events: RwLock<Vec<FailoverEvent>>,
}

impl FailoverManager {
    /// Build a manager from `(provider, priority)` pairs.
    ///
    /// Providers are sorted ascending by priority; each tier gets its
    /// own circuit breaker. Fails on an empty provider set.
    pub fn new(
        providers: Vec<(Arc<dyn Provider>, u32)>,
        config: FailoverConfig,
    ) -> Result<Self> {
        if providers.is_empty() {
            return Err(Error::Config(
                "at least one provider tier is required".to_string(),
            ));
        }

        let mut ranked = providers;
        ranked.sort_by_key(|(_, priority)| *priority);

        let breaker_config = config.breaker_config();
        let tiers: Vec<ProviderTier> = ranked
            .into_iter()
            .map(|(provider, priority)| {
                ProviderTier::new(provider, priority, breaker_config.clone())
            })
            .collect();

        let stats = tiers
            .iter()
            .map(|_| RwLock::new(CallMetrics::new(config.max_samples)))
            .collect();

        Ok(Self {
            tiers,
            config,
            stats,
            totals: RwLock::new(CascadeTotals {
                requests: 0,
                failovers: 0,
                failover_times: Vec::new(),
                exhaustions: 0,
            }),
            events: RwLock::new(Vec::new()),
        })
    }

    /// The ranked tiers, in dispatch order.
    pub fn tiers(&self) -> &[ProviderTier] {
        &self.tiers
    }

    /// Configuration in effect.
    pub fn config(&self) -> &FailoverConfig {
        &self.config
    }

    /// Dispatch a request through the cascade.
    ///
    /// Attempts tiers in priority order until one succeeds or all are
    /// exhausted. Never returns an error: cascade exhaustion comes back
    /// as a failure [`FailoverResult`] with `human_escalation` set for
    /// crisis traffic.
    pub async fn make_request(&self, query: &str, context: RequestContext) -> FailoverResult {
        let started = Instant::now();
        let bypass = context.class.is_bypass();
        let policy = if bypass {
            CallPolicy::BypassOnOpen
        } else {
            CallPolicy::Normal
        };
        let session_id = context.session_id.clone();
        let request = SupportRequest::new(query, context);
        let last_index = self.tiers.len() - 1;

        self.write_totals().requests += 1;

        // Last tier that failed or was skipped, with the reason.
        let mut last_obstacle: Option<(String, String)> = None;

        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.breaker.state().is_open() && !bypass {
                tracing::debug!(
                    provider = tier.name(),
                    session_id = %session_id,
                    "skipping tier with open circuit"
                );
                last_obstacle = Some((tier.name().to_string(), "circuit open".to_string()));
                continue;
            }

            let attempt_started = Instant::now();
            let outcome = tier
                .breaker
                .call(
                    || tier.provider.make_request(&request),
                    policy,
                    Some(self.config.call_timeout),
                )
                .await;
            let attempt_ms = attempt_started.elapsed().as_millis() as u64;

            match outcome {
                Ok(response) => {
                    self.write_stats(index).record_success(attempt_ms);

                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    let sla_violation = elapsed_ms > self.config.sla_limit.as_millis() as u64;
                    if sla_violation {
                        tracing::warn!(
                            provider = tier.name(),
                            elapsed_ms,
                            limit_ms = self.config.sla_limit.as_millis() as u64,
                            "request answered past the SLA budget"
                        );
                    }

                    let failover_time_ms = if index > 0 {
                        self.record_failover(&last_obstacle, tier.name(), elapsed_ms);
                        Some(elapsed_ms)
                    } else {
                        None
                    };

                    tracing::info!(
                        provider = tier.name(),
                        tier = index + 1,
                        elapsed_ms,
                        session_id = %session_id,
                        "request answered"
                    );

                    return FailoverResult::success(
                        tier.name(),
                        index + 1,
                        elapsed_ms,
                        failover_time_ms,
                        sla_violation,
                        index == last_index,
                        response,
                    );
                }
                Err(err) => {
                    // An open-breaker rejection is not a dependency fault.
                    if !err.is_breaker_open() {
                        self.write_stats(index).record_failure(attempt_ms);
                    }
                    tracing::warn!(
                        provider = tier.name(),
                        error = %err,
                        session_id = %session_id,
                        "tier attempt failed, cascading"
                    );
                    last_obstacle = Some((tier.name().to_string(), err.to_string()));
                }
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.write_totals().exhaustions += 1;
        tracing::warn!(
            elapsed_ms,
            session_id = %session_id,
            crisis = bypass,
            "cascade exhausted, no tier answered"
        );

        FailoverResult::exhausted(elapsed_ms, bypass)
    }

    /// Probe every tier's provider concurrently.
    ///
    /// Probes are independent and side-effect-free; a failed probe is
    /// captured as an unhealthy entry, never propagated.
    pub async fn get_health_status(&self) -> Vec<TierHealth> {
        let probes = self.tiers.iter().map(|tier| async move {
            let started = Instant::now();
            match tier.provider.check_health().await {
                Ok(probe) => TierHealth {
                    provider: tier.name().to_string(),
                    priority: tier.priority,
                    healthy: probe.healthy,
                    response_time_ms: probe.response_time_ms,
                    breaker_state: tier.breaker.state(),
                    error: None,
                },
                Err(err) => TierHealth {
                    provider: tier.name().to_string(),
                    priority: tier.priority,
                    healthy: false,
                    response_time_ms: started.elapsed().as_millis() as u64,
                    breaker_state: tier.breaker.state(),
                    error: Some(err.to_string()),
                },
            }
        });

        join_all(probes).await
    }

    /// Aggregate cross-tier metrics.
    pub fn get_failover_metrics(&self) -> FailoverMetrics {
        let providers = self
            .tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| {
                let stats = self.read_stats(index);
                ProviderStats {
                    provider: tier.name().to_string(),
                    priority: tier.priority,
                    requests: stats.requests(),
                    failures: stats.failures(),
                    success_rate: 100.0 - stats.failure_rate(),
                    average_response_ms: stats.average_response_ms(),
                }
            })
            .collect();

        let totals = self
            .totals
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let average_failover_time_ms = if totals.failover_times.is_empty() {
            0.0
        } else {
            totals.failover_times.iter().sum::<u64>() as f64
                / totals.failover_times.len() as f64
        };

        FailoverMetrics {
            total_requests: totals.requests,
            total_failovers: totals.failovers,
            cascade_exhaustions: totals.exhaustions,
            average_failover_time_ms,
            providers,
            primary_breaker: self.tiers[0].breaker.get_metrics(),
        }
    }

    /// The `n` most recent failover events, newest first.
    pub fn recent_failovers(&self, n: usize) -> Vec<FailoverEvent> {
        self.events
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .rev()
            .take(n)
            .cloned()
            .collect()
    }

    fn record_failover(
        &self,
        last_obstacle: &Option<(String, String)>,
        to_provider: &str,
        elapsed_ms: u64,
    ) {
        let mut totals = self.write_totals();
        totals.failovers += 1;
        totals.failover_times.push(elapsed_ms);
        if totals.failover_times.len() > self.config.max_samples {
            totals.failover_times.remove(0);
        }
        drop(totals);

        let (from, reason) = match last_obstacle {
            Some((provider, reason)) => (provider.clone(), reason.clone()),
            None => (self.tiers[0].name().to_string(), "unavailable".to_string()),
        };
        let event = FailoverEvent::new(&from, to_provider, &reason);
        tracing::info!(
            from = %event.from_provider,
            to = %event.to_provider,
            reason = %event.reason,
            "failover recorded"
        );
        self.events
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    fn read_stats(&self, index: usize) -> RwLockReadGuard<'_, CallMetrics> {
        self.stats[index]
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_stats(&self, index: usize) -> RwLockWriteGuard<'_, CallMetrics> {
        self.stats[index]
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_totals(&self) -> RwLockWriteGuard<'_, CascadeTotals> {
        self.totals
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
