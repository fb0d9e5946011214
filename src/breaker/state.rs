//! Circuit breaker state machine states.

use serde::{Deserialize, Serialize};

/// The state of a circuit breaker.
///
/// Transitions follow a fixed graph: CLOSED opens once cumulative
/// failures reach the configured threshold, OPEN relaxes to HALF_OPEN
/// after the reset timeout, and HALF_OPEN resolves to CLOSED or back to
/// OPEN depending on the outcome of the next probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakerState {
    /// Normal operation; calls pass through and failures are counted.
    Closed,
    /// Dependency is unhealthy; calls are rejected immediately.
    Open,
    /// Probing for recovery; the next call decides the transition.
    HalfOpen,
}

impl BreakerState {
    /// Check if the state is CLOSED.
    pub fn is_closed(&self) -> bool {
        matches!(self, BreakerState::Closed)
    }

    /// Check if the state is OPEN.
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerState::Open)
    }

    /// Check if the state is HALF_OPEN.
    pub fn is_half_open(&self) -> bool {
        matches!(self, BreakerState::HalfOpen)
    }

    /// Lowercase label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }
}

impl Default for BreakerState {
    fn default() -> Self {
        BreakerState::Closed
    }
}

impl std::fmt::Display for BreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(BreakerState::Closed.is_closed());
        assert!(BreakerState::Open.is_open());
        assert!(BreakerState::HalfOpen.is_half_open());
        assert!(!BreakerState::Open.is_closed());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(BreakerState::Closed.name(), "closed");
        assert_eq!(BreakerState::Open.name(), "open");
        assert_eq!(BreakerState::HalfOpen.name(), "half_open");
    }

    #[test]
    fn test_default_is_closed() {
        assert_eq!(BreakerState::default(), BreakerState::Closed);
    }
}
