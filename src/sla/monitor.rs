//! SLA compliance monitoring.
//!
//! Ingests externally-measured latencies for the three service levels,
//! computes rolling-window compliance, and manages threshold alerts
//! with self-clearing recovery. The monitor never measures time itself;
//! callers supply every latency.
//!
//! Series and alert state are single-writer: the API takes `&mut self`
//! and performs no internal locking. Callers dispatching from multiple
//! tasks must serialize access themselves.

use crate::core::now;
use crate::sla::alerts::{AlertType, SlaAlert};
use crate::sla::config::SlaConfig;
use crate::sla::report::{ComplianceReport, TARGET_SLA_RATE};
use crate::sla::violation::{MetricKind, Severity, SlaSample, SlaViolation};
use serde::{Deserialize, Serialize};

/// Windowed compliance metrics for one service level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KindMetrics {
    /// Service level covered
    pub kind: MetricKind,
    /// Samples inside the window
    pub total: usize,
    /// Samples that met the budget
    pub within_sla: usize,
    /// Samples that missed the budget
    pub violations: usize,
    /// Compliance percentage in [0, 100]; exactly 0 with no samples
    pub compliance_rate: f64,
    /// Average measured latency (ms)
    pub average_ms: f64,
}

/// Monitor for the detection, response and notification budgets.
pub struct SlaMonitor {
    config: SlaConfig,
    detection: Vec<SlaSample>,
    response: Vec<SlaSample>,
    notification: Vec<SlaSample>,
    violations: Vec<SlaViolation>,
    alerts: Vec<SlaAlert>,
}

impl SlaMonitor {
    /// Create a monitor with the given budgets.
    pub fn new(config: SlaConfig) -> Self {
        Self {
            config,
            detection: Vec::new(),
            response: Vec::new(),
            notification: Vec::new(),
            violations: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &SlaConfig {
        &self.config
    }

    /// Record how long crisis detection took for a message.
    pub fn track_detection(&mut self, message_id: &str, measured_ms: u64) {
        self.track(MetricKind::Detection, message_id, measured_ms);
    }

    /// Record how long producing a response took for a session.
    pub fn track_response(&mut self, session_id: &str, measured_ms: u64) {
        self.track(MetricKind::Response, session_id, measured_ms);
    }

    /// Record how long delivering a notification took on a channel.
    pub fn track_notification(&mut self, channel: &str, measured_ms: u64) {
        self.track(MetricKind::Notification, channel, measured_ms);
    }

    /// Windowed detection metrics.
    pub fn detection_metrics(&self, window_ms: u64) -> KindMetrics {
        self.kind_metrics(MetricKind::Detection, window_ms)
    }

    /// Windowed response metrics.
    pub fn response_metrics(&self, window_ms: u64) -> KindMetrics {
        self.kind_metrics(MetricKind::Response, window_ms)
    }

    /// Windowed notification metrics.
    pub fn notification_metrics(&self, window_ms: u64) -> KindMetrics {
        self.kind_metrics(MetricKind::Notification, window_ms)
    }

    /// Merge all three service levels into one report.
    pub fn generate_compliance_report(&self, window_ms: u64) -> ComplianceReport {
        let detection = self.detection_metrics(window_ms);
        let response = self.response_metrics(window_ms);
        let notification = self.notification_metrics(window_ms);

        let total = detection.total + response.total + notification.total;
        let within = detection.within_sla + response.within_sla + notification.within_sla;
        let overall_compliance_rate = if total == 0 {
            0.0
        } else {
            within as f64 / total as f64 * 100.0
        };

        let window_start = now() - chrono::Duration::milliseconds(window_ms as i64);
        let critical_violations = self
            .violations
            .iter()
            .filter(|v| v.timestamp >= window_start && v.kind.is_critical())
            .count();

        ComplianceReport {
            generated_at: now(),
            window_ms,
            detection,
            response,
            notification,
            overall_compliance_rate,
            meets_target_sla: overall_compliance_rate >= TARGET_SLA_RATE,
            critical_violations,
        }
    }

    /// Active alerts, expiring anything past the TTL first.
    pub fn active_alerts(&mut self) -> Vec<SlaAlert> {
        let ttl = self.config.alert_ttl_ms;
        self.alerts.retain(|alert| !alert.is_expired(ttl));
        self.alerts.clone()
    }

    /// All recorded violations, oldest first.
    pub fn violations(&self) -> &[SlaViolation] {
        &self.violations
    }

    /// The `n` most recent violations, newest first.
    pub fn recent_violations(&self, n: usize) -> Vec<&SlaViolation> {
        self.violations.iter().rev().take(n).collect()
    }

    /// Count of violations inside a trailing window.
    pub fn violations_in_window(&self, window_ms: u64) -> usize {
        let window_start = now() - chrono::Duration::milliseconds(window_ms as i64);
        self.violations
            .iter()
            .filter(|v| v.timestamp >= window_start)
            .count()
    }

    /// Number of samples held for one service level.
    pub fn sample_count(&self, kind: MetricKind) -> usize {
        self.series(kind).len()
    }

    /// Drop the violation log. Samples and alerts are kept.
    pub fn clear_violations(&mut self) {
        self.violations.clear();
    }

    fn track(&mut self, kind: MetricKind, reference: &str, measured_ms: u64) {
        let limit = self.config.limit_for(kind);
        let within_sla = measured_ms <= limit;

        self.series_mut(kind).push(SlaSample {
            reference: reference.to_string(),
            timestamp: now(),
            measured_ms,
            within_sla,
        });

        if within_sla {
            self.check_recovery();
            return;
        }

        let violation = SlaViolation::new(kind, reference, measured_ms, limit);
        tracing::warn!(
            kind = %kind,
            reference,
            actual_ms = measured_ms,
            limit_ms = limit,
            overrun_ms = violation.overrun_ms,
            "SLA budget breached"
        );

        if kind == MetricKind::Response {
            let description = format!(
                "response for '{}' took {}ms against a {}ms budget",
                reference, measured_ms, limit
            );
            self.raise(SlaAlert::new(
                AlertType::CriticalResponseFailure,
                Severity::Critical,
                &description,
            ));
        }

        self.violations.push(violation);
        self.check_alert_thresholds();
    }

    /// Raise the aggregate alert once the windowed violation count hits
    /// the critical threshold, deduplicated against active instances.
    fn check_alert_thresholds(&mut self) {
        let recent = self.violations_in_window(self.config.violation_window_ms);
        if recent < self.config.critical_violation_threshold {
            return;
        }

        let ttl = self.config.alert_ttl_ms;
        let already_active = self.alerts.iter().any(|alert| {
            alert.alert_type == AlertType::MultipleSlaViolations && !alert.is_expired(ttl)
        });
        if already_active {
            return;
        }

        let description = format!(
            "{} SLA violations within the last {}ms",
            recent, self.config.violation_window_ms
        );
        let alert = SlaAlert::new(
            AlertType::MultipleSlaViolations,
            Severity::Critical,
            &description,
        )
        .with_violation_count(recent);
        self.raise(alert);
    }

    /// Clear violation alerts once recovery evidence accumulates:
    /// enough successful operations in the window while the windowed
    /// violation count stays below the critical threshold.
    fn check_recovery(&mut self) {
        let window_start =
            now() - chrono::Duration::milliseconds(self.config.violation_window_ms as i64);
        let successes = [&self.detection, &self.response, &self.notification]
            .into_iter()
            .flatten()
            .filter(|s| s.within_sla && s.timestamp >= window_start)
            .count();

        if successes < self.config.improvement_threshold {
            return;
        }
        if self.violations_in_window(self.config.violation_window_ms)
            >= self.config.critical_violation_threshold
        {
            return;
        }

        let before = self.alerts.len();
        self.alerts.retain(|alert| {
            !matches!(
                alert.alert_type,
                AlertType::MultipleSlaViolations | AlertType::CriticalResponseFailure
            )
        });
        if self.alerts.len() < before {
            tracing::info!(
                cleared = before - self.alerts.len(),
                "alerts cleared on recovery evidence"
            );
        }
    }

    fn raise(&mut self, alert: SlaAlert) {
        tracing::warn!(
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            description = %alert.description,
            "alert raised"
        );
        self.alerts.push(alert);
    }

    fn series(&self, kind: MetricKind) -> &Vec<SlaSample> {
        match kind {
            MetricKind::Detection => &self.detection,
            MetricKind::Response => &self.response,
            MetricKind::Notification => &self.notification,
        }
    }

    fn series_mut(&mut self, kind: MetricKind) -> &mut Vec<SlaSample> {
        match kind {
            MetricKind::Detection => &mut self.detection,
            MetricKind::Response => &mut self.response,
            MetricKind::Notification => &mut self.notification,
        }
    }
}

impl Default for SlaMonitor {
    fn default() -> Self {
        Self::new(SlaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const HOUR_MS: u64 = 60 * 60 * 1_000;

    #[test]
    fn test_within_budget_records_no_violation() {
        let mut monitor = SlaMonitor::default();
        monitor.track_detection("msg-1", 300);

        assert_eq!(monitor.sample_count(MetricKind::Detection), 1);
        assert!(monitor.violations().is_empty());
    }

    #[test]
    fn test_breach_records_violation() {
        let mut monitor = SlaMonitor::default();
        monitor.track_detection("msg-1", 700);

        let violations = monitor.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, MetricKind::Detection);
        assert_eq!(violations[0].actual_ms, 700);
        assert_eq!(violations[0].limit_ms, 500);
        assert_eq!(violations[0].overrun_ms, 200);
        assert_eq!(violations[0].severity, Severity::Warning);
    }

    #[test]
    fn test_exact_limit_is_within_budget() {
        let mut monitor = SlaMonitor::default();
        monitor.track_response("s1", 2_000);

        assert!(monitor.violations().is_empty());
    }

    #[test]
    fn test_compliance_zero_for_empty_window() {
        let monitor = SlaMonitor::default();

        let metrics = monitor.detection_metrics(HOUR_MS);
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.compliance_rate, 0.0);
        assert_eq!(metrics.average_ms, 0.0);

        let report = monitor.generate_compliance_report(HOUR_MS);
        assert_eq!(report.overall_compliance_rate, 0.0);
        assert!(!report.meets_target_sla);
    }

    #[test]
    fn test_kind_metrics_derivation() {
        let mut monitor = SlaMonitor::default();
        monitor.track_response("s1", 1_000);
        monitor.track_response("s2", 1_500);
        monitor.track_response("s3", 3_500);

        let metrics = monitor.response_metrics(HOUR_MS);
        assert_eq!(metrics.total, 3);
        assert_eq!(metrics.within_sla, 2);
        assert_eq!(metrics.violations, 1);
        assert!((metrics.compliance_rate - 66.666).abs() < 0.01);
        assert!((metrics.average_ms - 2_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_window_excludes_old_samples() {
        let mut monitor = SlaMonitor::default();
        monitor.track_detection("old", 300);
        monitor.detection[0].timestamp = now() - Duration::hours(2);
        monitor.track_detection("fresh", 300);

        let metrics = monitor.detection_metrics(HOUR_MS);
        assert_eq!(metrics.total, 1);
    }

    #[test]
    fn test_compliance_report_scenario() {
        // 998 detections at 400ms and 2 late ones against a 500ms budget.
        let mut monitor = SlaMonitor::default();
        for i in 0..998 {
            monitor.track_detection(&format!("msg-{i}"), 400);
        }
        monitor.track_detection("msg-late-1", 600);
        monitor.track_detection("msg-late-2", 700);

        let report = monitor.generate_compliance_report(HOUR_MS);
        assert!((report.overall_compliance_rate - 99.8).abs() < 1e-6);
        assert!(!report.meets_target_sla);
        // Late detections are warnings, not critical violations.
        assert_eq!(report.critical_violations, 0);
    }

    #[test]
    fn test_critical_violations_count_policy() {
        let mut monitor = SlaMonitor::default();
        monitor.track_detection("msg-1", 700);
        monitor.track_response("s1", 5_000);
        monitor.track_notification("teams", 90_000);

        let report = monitor.generate_compliance_report(HOUR_MS);
        assert_eq!(report.critical_violations, 2);
    }

    #[test]
    fn test_multiple_violations_alert_raised_once() {
        let mut monitor = SlaMonitor::default();
        for i in 0..3 {
            monitor.track_notification(&format!("ch-{i}"), 90_000);
        }

        let alerts = monitor.active_alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::MultipleSlaViolations);
        assert_eq!(alerts[0].violation_count, Some(3));

        // Further violations must not duplicate the active alert.
        monitor.track_notification("ch-3", 90_000);
        monitor.track_notification("ch-4", 90_000);
        let alerts = monitor.active_alerts();
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_two_violations_raise_nothing() {
        let mut monitor = SlaMonitor::default();
        monitor.track_notification("ch-0", 90_000);
        monitor.track_notification("ch-1", 90_000);

        assert!(monitor.active_alerts().is_empty());
    }

    #[test]
    fn test_response_breach_always_alerts() {
        let mut monitor = SlaMonitor::default();
        monitor.track_response("s1", 5_000);
        monitor.track_response("s2", 6_000);

        let alerts = monitor.active_alerts();
        let response_failures = alerts
            .iter()
            .filter(|a| a.alert_type == AlertType::CriticalResponseFailure)
            .count();
        assert_eq!(response_failures, 2);
    }

    #[test]
    fn test_recovery_clears_alerts() {
        let mut monitor = SlaMonitor::default();
        for i in 0..3 {
            monitor.track_notification(&format!("ch-{i}"), 90_000);
        }
        assert_eq!(monitor.active_alerts().len(), 1);

        // Age the violations out of the trailing window, then deliver
        // enough on-budget operations to prove recovery.
        let aged = now() - Duration::milliseconds(11 * 60 * 1_000);
        for violation in &mut monitor.violations {
            violation.timestamp = aged;
        }
        for i in 0..10 {
            monitor.track_detection(&format!("msg-{i}"), 300);
        }

        assert!(monitor.active_alerts().is_empty());
    }

    #[test]
    fn test_recovery_blocked_while_violations_fresh() {
        let mut monitor = SlaMonitor::default();
        for i in 0..3 {
            monitor.track_notification(&format!("ch-{i}"), 90_000);
        }
        for i in 0..15 {
            monitor.track_detection(&format!("msg-{i}"), 300);
        }

        // Violations are still inside the window, so the alert holds.
        assert_eq!(monitor.active_alerts().len(), 1);
    }

    #[test]
    fn test_alert_ttl_expiry() {
        let mut monitor = SlaMonitor::default();
        for i in 0..3 {
            monitor.track_notification(&format!("ch-{i}"), 90_000);
        }
        assert_eq!(monitor.active_alerts().len(), 1);

        monitor.alerts[0].timestamp = now() - Duration::hours(25);
        assert!(monitor.active_alerts().is_empty());
    }

    #[test]
    fn test_recent_violations_order() {
        let mut monitor = SlaMonitor::default();
        monitor.track_detection("first", 700);
        monitor.track_detection("second", 800);

        let recent = monitor.recent_violations(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].reference, "second");
    }

    #[test]
    fn test_clear_violations() {
        let mut monitor = SlaMonitor::default();
        monitor.track_detection("msg-1", 700);
        monitor.clear_violations();

        assert!(monitor.violations().is_empty());
        assert_eq!(monitor.sample_count(MetricKind::Detection), 1);
    }
}
