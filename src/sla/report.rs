//! SLA compliance reports.
//!
//! Merges the three service levels into one dashboard-ready summary.

use crate::core::Timestamp;
use crate::sla::monitor::KindMetrics;
use serde::{Deserialize, Serialize};

/// Overall compliance target: three nines and a half.
pub const TARGET_SLA_RATE: f64 = 99.9;

/// Cross-kind compliance summary over one window.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// When the report was generated
    pub generated_at: Timestamp,
    /// Window the report covers (ms)
    pub window_ms: u64,
    /// Detection-kind metrics
    pub detection: KindMetrics,
    /// Response-kind metrics
    pub response: KindMetrics,
    /// Notification-kind metrics
    pub notification: KindMetrics,
    /// Merged compliance percentage in [0, 100]; 0 with no samples
    pub overall_compliance_rate: f64,
    /// Whether the merged rate meets [`TARGET_SLA_RATE`]
    pub meets_target_sla: bool,
    /// Windowed violations of response and notification kind
    pub critical_violations: usize,
}

impl ComplianceReport {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Render as plain text for logs and paging.
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("SLA Compliance Report\n");
        output.push_str(&format!("Generated: {}\n", self.generated_at));
        output.push_str(&format!("Window: {}ms\n", self.window_ms));
        output.push_str(&format!(
            "Status: {}\n",
            if self.meets_target_sla {
                "MEETS TARGET"
            } else {
                "BELOW TARGET"
            }
        ));
        output.push_str(&format!(
            "Overall compliance: {:.2}% (target {:.1}%)\n",
            self.overall_compliance_rate, TARGET_SLA_RATE
        ));

        output.push_str("\nPer level:\n");
        for metrics in [&self.detection, &self.response, &self.notification] {
            output.push_str(&format!(
                "  {}: {:.2}% ({}/{} within budget, avg {:.0}ms)\n",
                metrics.kind,
                metrics.compliance_rate,
                metrics.within_sla,
                metrics.total,
                metrics.average_ms
            ));
        }

        if self.critical_violations > 0 {
            output.push_str(&format!(
                "\nCritical violations: {}\n",
                self.critical_violations
            ));
        }

        output
    }
}
