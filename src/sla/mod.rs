//! SLA Module
//!
//! Provides Service Level Agreement monitoring:
//! - Per-kind latency budgets (detection, response, notification)
//! - Rolling-window compliance metrics and reports
//! - Threshold alerting with self-clearing recovery

pub mod alerts;
pub mod config;
pub mod monitor;
pub mod report;
pub mod violation;

pub use alerts::{AlertType, SlaAlert};
pub use config::SlaConfig;
pub use monitor::{KindMetrics, SlaMonitor};
pub use report::ComplianceReport;
pub use violation::{MetricKind, Severity, SlaSample, SlaViolation};
