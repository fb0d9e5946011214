//! SLA monitoring configuration.

use crate::sla::violation::MetricKind;

/// Latency budgets and alerting thresholds for the SLA monitor.
#[derive(Clone, Debug)]
pub struct SlaConfig {
    /// Crisis-detection latency budget (ms).
    pub detection_limit_ms: u64,
    /// Response latency budget (ms).
    pub response_limit_ms: u64,
    /// Notification delivery budget (ms).
    pub notification_limit_ms: u64,
    /// Trailing window for violation counting and recovery evidence (ms).
    pub violation_window_ms: u64,
    /// Violations inside the window before the aggregate alert fires.
    pub critical_violation_threshold: usize,
    /// Successes inside the window required to clear alerts.
    pub improvement_threshold: usize,
    /// Active alerts expire after this horizon (ms).
    pub alert_ttl_ms: u64,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            detection_limit_ms: 500,
            response_limit_ms: 2_000,
            notification_limit_ms: 60_000,
            violation_window_ms: 10 * 60 * 1_000,
            critical_violation_threshold: 3,
            improvement_threshold: 10,
            alert_ttl_ms: 24 * 60 * 60 * 1_000,
        }
    }
}

impl SlaConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the detection budget.
    pub fn with_detection_limit_ms(mut self, limit: u64) -> Self {
        self.detection_limit_ms = limit;
        self
    }

    /// Set the response budget.
    pub fn with_response_limit_ms(mut self, limit: u64) -> Self {
        self.response_limit_ms = limit;
        self
    }

    /// Set the notification budget.
    pub fn with_notification_limit_ms(mut self, limit: u64) -> Self {
        self.notification_limit_ms = limit;
        self
    }

    /// Set the trailing violation window.
    pub fn with_violation_window_ms(mut self, window: u64) -> Self {
        self.violation_window_ms = window;
        self
    }

    /// Set the aggregate-alert threshold.
    pub fn with_critical_violation_threshold(mut self, threshold: usize) -> Self {
        self.critical_violation_threshold = threshold;
        self
    }

    /// Set the recovery-evidence threshold.
    pub fn with_improvement_threshold(mut self, threshold: usize) -> Self {
        self.improvement_threshold = threshold;
        self
    }

    /// Budget for a metric kind (ms).
    pub fn limit_for(&self, kind: MetricKind) -> u64 {
        match kind {
            MetricKind::Detection => self.detection_limit_ms,
            MetricKind::Response => self.response_limit_ms,
            MetricKind::Notification => self.notification_limit_ms,
        }
    }
}
