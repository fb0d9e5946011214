//! # VitalGuard - Resilience & SLA Compliance Engine
//!
//! A fault-isolation and graceful-degradation engine for healthcare
//! support traffic, providing:
//! - **Circuit Breaker**: per-dependency fault isolation with fail-fast
//!   rejection and lazy recovery probing
//! - **Failover Manager**: ordered multi-tier dispatch with a bypass
//!   policy for crisis traffic
//! - **SLA Monitor**: rolling-window compliance tracking with
//!   self-clearing threshold alerts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vitalguard::sla::{SlaConfig, SlaMonitor};
//!
//! fn main() {
//!     let mut monitor = SlaMonitor::new(SlaConfig::default());
//!     monitor.track_response("session-1", 1400);
//!     let report = monitor.generate_compliance_report(60_000);
//!     println!("{}", report.to_text());
//! }
//! ```

pub mod breaker;
pub mod core;
pub mod failover;
pub mod sla;

pub use crate::core::error::{Error, Result};
