//! Provider contract consumed by the failover manager.
//!
//! Providers are external collaborators (model backends, knowledge
//! bases, canned-response stores); the engine only needs a name, a
//! priority rank, and these two async operations.

use crate::core::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Traffic classification for a support request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestClass {
    /// Ordinary support traffic; respects breaker state.
    Standard,
    /// Life-safety traffic; permitted to ignore an OPEN breaker.
    Crisis,
}

impl RequestClass {
    /// Whether this class bypasses open circuits.
    pub fn is_bypass(&self) -> bool {
        matches!(self, RequestClass::Crisis)
    }
}

impl std::fmt::Display for RequestClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestClass::Standard => write!(f, "standard"),
            RequestClass::Crisis => write!(f, "crisis"),
        }
    }
}

/// Caller-supplied context accompanying a request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestContext {
    /// Conversation/session correlation id
    pub session_id: String,
    /// Traffic class
    pub class: RequestClass,
}

impl RequestContext {
    /// Context for ordinary traffic.
    pub fn standard(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            class: RequestClass::Standard,
        }
    }

    /// Context for life-safety traffic.
    pub fn crisis(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            class: RequestClass::Crisis,
        }
    }
}

/// A request dispatched to a provider tier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SupportRequest {
    /// User query text
    pub query: String,
    /// Request context
    pub context: RequestContext,
}

impl SupportRequest {
    /// Create a new request.
    pub fn new(query: &str, context: RequestContext) -> Self {
        Self {
            query: query.to_string(),
            context,
        }
    }
}

/// A provider's answer to a request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Response text
    pub text: String,
    /// Provider-reported confidence in [0, 1]
    pub confidence: f32,
    /// Which knowledge source produced the answer
    pub source: String,
}

/// Result of a side-effect-free health probe.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthProbe {
    /// Provider considers itself healthy
    pub healthy: bool,
    /// Probe round-trip time (ms)
    pub response_time_ms: u64,
}

/// Capability every upstream provider must implement.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Declared provider name.
    fn name(&self) -> &str;

    /// Answer a support request, or fail with a provider error.
    async fn make_request(&self, request: &SupportRequest) -> Result<ProviderResponse>;

    /// Side-effect-free health probe.
    async fn check_health(&self) -> Result<HealthProbe>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_class_bypass() {
        assert!(RequestClass::Crisis.is_bypass());
        assert!(!RequestClass::Standard.is_bypass());
    }

    #[test]
    fn test_context_constructors() {
        let ctx = RequestContext::crisis("session-9");
        assert_eq!(ctx.session_id, "session-9");
        assert_eq!(ctx.class, RequestClass::Crisis);

        let ctx = RequestContext::standard("session-1");
        assert_eq!(ctx.class, RequestClass::Standard);
    }

    #[test]
    fn test_class_display() {
        assert_eq!(RequestClass::Crisis.to_string(), "crisis");
        assert_eq!(RequestClass::Standard.to_string(), "standard");
    }
}
