//! Structured cascade outcomes.
//!
//! The dispatch loop never throws: success and exhaustion both come
//! back as a `FailoverResult` value.

use crate::core::{now, Error, Timestamp};
use crate::failover::provider::ProviderResponse;
use serde::{Deserialize, Serialize};

/// Outcome of one cascade through the provider tiers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailoverResult {
    /// Whether any tier answered
    pub success: bool,
    /// Provider that answered
    pub provider: Option<String>,
    /// 1-indexed tier that answered; 0 on exhaustion
    pub tier: usize,
    /// Total elapsed time since the request began (ms)
    pub response_time_ms: u64,
    /// Time to reach the answering tier; present only past tier 1
    pub failover_time_ms: Option<u64>,
    /// Whether the elapsed time breached the SLA limit
    pub sla_violation: bool,
    /// Answer came from the last configured tier
    pub emergency_response: bool,
    /// Caller must hand off to a human now
    pub human_escalation: bool,
    /// Terminal error description on exhaustion
    pub error: Option<String>,
    /// The answering provider's response
    pub response: Option<ProviderResponse>,
}

impl FailoverResult {
    /// Build a success outcome for the answering tier.
    pub fn success(
        provider: &str,
        tier: usize,
        response_time_ms: u64,
        failover_time_ms: Option<u64>,
        sla_violation: bool,
        emergency_response: bool,
        response: ProviderResponse,
    ) -> Self {
        Self {
            success: true,
            provider: Some(provider.to_string()),
            tier,
            response_time_ms,
            failover_time_ms,
            sla_violation,
            emergency_response,
            human_escalation: false,
            error: None,
            response: Some(response),
        }
    }

    /// Build the terminal outcome for a fully exhausted cascade.
    pub fn exhausted(response_time_ms: u64, human_escalation: bool) -> Self {
        Self {
            success: false,
            provider: None,
            tier: 0,
            response_time_ms,
            failover_time_ms: None,
            sla_violation: true,
            emergency_response: false,
            human_escalation,
            error: Some(Error::CascadeExhausted.to_string()),
            response: None,
        }
    }
}

/// A recorded failover from one tier to another.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailoverEvent {
    /// Event ID
    pub id: String,
    /// Tier that failed or was skipped
    pub from_provider: String,
    /// Tier that answered
    pub to_provider: String,
    /// When the failover completed
    pub timestamp: Timestamp,
    /// Why the earlier tier was passed over
    pub reason: String,
}

impl FailoverEvent {
    /// Record a failover between two named tiers.
    pub fn new(from_provider: &str, to_provider: &str, reason: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from_provider: from_provider.to_string(),
            to_provider: to_provider.to_string(),
            timestamp: now(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response() -> ProviderResponse {
        ProviderResponse {
            text: "answer".to_string(),
            confidence: 0.9,
            source: "kb".to_string(),
        }
    }

    #[test]
    fn test_success_result() {
        let result =
            FailoverResult::success("primary", 1, 120, None, false, false, sample_response());
        assert!(result.success);
        assert_eq!(result.tier, 1);
        assert_eq!(result.provider.as_deref(), Some("primary"));
        assert!(result.error.is_none());
        assert!(!result.human_escalation);
    }

    #[test]
    fn test_exhausted_result() {
        let result = FailoverResult::exhausted(9000, true);
        assert!(!result.success);
        assert_eq!(result.tier, 0);
        assert!(result.sla_violation);
        assert!(result.human_escalation);
        assert!(result.error.is_some());
        assert!(result.response.is_none());
    }

    #[test]
    fn test_failover_event() {
        let event = FailoverEvent::new("primary", "backup", "circuit open");
        assert_eq!(event.from_provider, "primary");
        assert_eq!(event.to_provider, "backup");
        assert!(!event.id.is_empty());
    }
}
