//! Ranked provider tiers.

use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::failover::provider::Provider;
use std::sync::Arc;

/// One ranked upstream provider plus its dedicated circuit breaker.
///
/// Tiers are sorted ascending by priority once at construction; the
/// ordering is immutable thereafter.
pub struct ProviderTier {
    /// The upstream provider
    pub provider: Arc<dyn Provider>,
    /// Priority rank; lower is tried first
    pub priority: u32,
    /// Breaker guarding this tier
    pub breaker: CircuitBreaker,
}

impl ProviderTier {
    /// Wrap a provider in a tier with its own breaker.
    pub fn new(provider: Arc<dyn Provider>, priority: u32, breaker_config: BreakerConfig) -> Self {
        let breaker = CircuitBreaker::new(provider.name(), breaker_config);
        Self {
            provider,
            priority,
            breaker,
        }
    }

    /// Name of the tier's provider.
    pub fn name(&self) -> &str {
        self.provider.name()
    }
}

impl std::fmt::Debug for ProviderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderTier")
            .field("provider", &self.provider.name())
            .field("priority", &self.priority)
            .field("breaker", &self.breaker)
            .finish()
    }
}
