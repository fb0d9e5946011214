//! SLA alert records.

use crate::core::{now, Timestamp};
use crate::sla::violation::Severity;
use serde::{Deserialize, Serialize};

/// Alert categories raised by the monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertType {
    /// Violation count inside the trailing window reached the critical
    /// threshold. At most one active instance exists at a time.
    MultipleSlaViolations,
    /// One response-kind budget breach. Raised for every occurrence.
    CriticalResponseFailure,
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertType::MultipleSlaViolations => write!(f, "multiple_sla_violations"),
            AlertType::CriticalResponseFailure => write!(f, "critical_response_failure"),
        }
    }
}

/// An active alert.
///
/// Alerts self-clear on recovery evidence and expire after a fixed
/// horizon regardless.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlaAlert {
    /// Alert ID
    pub id: String,
    /// Alert category
    pub alert_type: AlertType,
    /// Severity
    pub severity: Severity,
    /// When the alert was raised
    pub timestamp: Timestamp,
    /// Human-readable description for paging
    pub description: String,
    /// Windowed violation count, for aggregate alerts
    pub violation_count: Option<usize>,
}

impl SlaAlert {
    /// Raise a new alert.
    pub fn new(alert_type: AlertType, severity: Severity, description: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            alert_type,
            severity,
            timestamp: now(),
            description: description.to_string(),
            violation_count: None,
        }
    }

    /// Attach the windowed violation count.
    pub fn with_violation_count(mut self, count: usize) -> Self {
        self.violation_count = Some(count);
        self
    }

    /// Whether the alert is past its expiry horizon.
    pub fn is_expired(&self, ttl_ms: u64) -> bool {
        crate::core::millis_between(self.timestamp, now()) >= ttl_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_alert_type_labels() {
        assert_eq!(
            AlertType::MultipleSlaViolations.to_string(),
            "multiple_sla_violations"
        );
        assert_eq!(
            AlertType::CriticalResponseFailure.to_string(),
            "critical_response_failure"
        );
    }

    #[test]
    fn test_fresh_alert_not_expired() {
        let alert = SlaAlert::new(
            AlertType::CriticalResponseFailure,
            Severity::Critical,
            "response took 5000ms",
        );
        assert!(!alert.is_expired(86_400_000));
    }

    #[test]
    fn test_backdated_alert_expires() {
        let mut alert = SlaAlert::new(
            AlertType::MultipleSlaViolations,
            Severity::Critical,
            "4 violations in 10m",
        )
        .with_violation_count(4);
        alert.timestamp = now() - Duration::hours(25);

        assert!(alert.is_expired(86_400_000));
        assert_eq!(alert.violation_count, Some(4));
    }
}
