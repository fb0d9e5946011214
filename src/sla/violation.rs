//! SLA violation and sample records.

use crate::core::{now, Timestamp};
use serde::{Deserialize, Serialize};

/// The three independently-budgeted service levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Time to flag an incoming message for crisis handling.
    Detection,
    /// Time to produce an answer for the user.
    Response,
    /// Time to deliver an escalation notification.
    Notification,
}

impl MetricKind {
    /// Severity policy for a breach of this kind.
    ///
    /// A late detection has not yet exposed anyone to risk; a late
    /// response or a missed notification has.
    pub fn severity(&self) -> Severity {
        match self {
            MetricKind::Detection => Severity::Warning,
            MetricKind::Response | MetricKind::Notification => Severity::Critical,
        }
    }

    /// Whether breaches of this kind count as critical violations.
    pub fn is_critical(&self) -> bool {
        self.severity() == Severity::Critical
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::Detection => write!(f, "detection"),
            MetricKind::Response => write!(f, "response"),
            MetricKind::Notification => write!(f, "notification"),
        }
    }
}

/// Violation severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Budget missed without direct user exposure
    Warning,
    /// Budget missed with direct user exposure
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One externally-measured latency sample.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlaSample {
    /// Caller-supplied correlation id
    pub reference: String,
    /// When the sample was recorded
    pub timestamp: Timestamp,
    /// Measured latency (ms)
    pub measured_ms: u64,
    /// Whether the sample met its budget
    pub within_sla: bool,
}

/// A recorded budget breach. Append-only, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlaViolation {
    /// Violation ID
    pub id: String,
    /// Caller-supplied correlation id
    pub reference: String,
    /// Which budget was breached
    pub kind: MetricKind,
    /// When the breach was recorded
    pub timestamp: Timestamp,
    /// Measured latency (ms)
    pub actual_ms: u64,
    /// Budget that applied (ms)
    pub limit_ms: u64,
    /// How far past the budget the measurement landed (ms)
    pub overrun_ms: u64,
    /// Severity per the kind's policy
    pub severity: Severity,
}

impl SlaViolation {
    /// Record a breach of `kind`'s budget.
    pub fn new(kind: MetricKind, reference: &str, actual_ms: u64, limit_ms: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            reference: reference.to_string(),
            kind,
            timestamp: now(),
            actual_ms,
            limit_ms,
            overrun_ms: actual_ms.saturating_sub(limit_ms),
            severity: kind.severity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_policy() {
        assert_eq!(MetricKind::Detection.severity(), Severity::Warning);
        assert_eq!(MetricKind::Response.severity(), Severity::Critical);
        assert_eq!(MetricKind::Notification.severity(), Severity::Critical);
        assert!(!MetricKind::Detection.is_critical());
        assert!(MetricKind::Response.is_critical());
    }

    #[test]
    fn test_violation_overrun() {
        let violation = SlaViolation::new(MetricKind::Detection, "msg-1", 700, 500);
        assert_eq!(violation.overrun_ms, 200);
        assert_eq!(violation.severity, Severity::Warning);
        assert!(!violation.id.is_empty());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MetricKind::Detection.to_string(), "detection");
        assert_eq!(MetricKind::Response.to_string(), "response");
        assert_eq!(MetricKind::Notification.to_string(), "notification");
    }
}
