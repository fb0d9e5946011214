//! Error types for VitalGuard.

use thiserror::Error;

/// Result type alias for VitalGuard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in VitalGuard operations.
#[derive(Error, Debug)]
pub enum Error {
    // Circuit breaker errors
    #[error("circuit breaker for '{provider}' is open")]
    BreakerOpen {
        /// Provider guarded by the open breaker
        provider: String,
    },

    #[error("call to '{provider}' timed out after {waited_ms}ms")]
    Timeout {
        /// Provider that failed to respond in time
        provider: String,
        /// How long the call was allowed to run
        waited_ms: u64,
    },

    // Provider errors
    #[error("provider '{provider}' failed: {message}")]
    Provider {
        /// Provider that reported the failure
        provider: String,
        /// Opaque failure description
        message: String,
    },

    #[error("health probe for '{provider}' failed: {message}")]
    HealthProbeFailed {
        /// Provider that failed its probe
        provider: String,
        /// Opaque failure description
        message: String,
    },

    // Cascade errors
    #[error("all provider tiers exhausted")]
    CascadeExhausted,

    // Configuration errors
    #[error("invalid configuration: {0}")]
    Config(String),

    // Generic errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a provider failure.
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// True for the fail-fast rejection of an open breaker.
    ///
    /// An open-breaker rejection is not a dependency fault: the call was
    /// never attempted, so it must not be retried against the same tier.
    pub fn is_breaker_open(&self) -> bool {
        matches!(self, Error::BreakerOpen { .. })
    }

    /// True when the call was cut off by the deadline race.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaker_open_classification() {
        let err = Error::BreakerOpen {
            provider: "primary".to_string(),
        };
        assert!(err.is_breaker_open());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_classification() {
        let err = Error::Timeout {
            provider: "primary".to_string(),
            waited_ms: 3000,
        };
        assert!(err.is_timeout());
        assert!(!err.is_breaker_open());
    }

    #[test]
    fn test_provider_error_display() {
        let err = Error::provider("backup", "connection refused");
        assert_eq!(
            err.to_string(),
            "provider 'backup' failed: connection refused"
        );
    }
}
