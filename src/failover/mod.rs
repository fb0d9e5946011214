//! Failover Module
//!
//! Provides tiered dispatch across ranked providers:
//! - Provider contract and request classification
//! - Ordered tiers, each behind its own circuit breaker
//! - Cascade dispatch with bypass policy for crisis traffic
//! - Cross-tier metrics and health probing

pub mod manager;
pub mod provider;
pub mod result;
pub mod tier;

pub use manager::{FailoverConfig, FailoverManager, FailoverMetrics, ProviderStats, TierHealth};
pub use provider::{
    HealthProbe, Provider, ProviderResponse, RequestClass, RequestContext, SupportRequest,
};
pub use result::{FailoverEvent, FailoverResult};
pub use tier::ProviderTier;
