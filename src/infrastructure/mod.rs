//! Infrastructure Layer
//!
//! Outward-facing adapters of the simulator:
//! - Display sinks (log, no-op) behind the `DisplayPort` trait
//! - Prometheus metrics collection

pub mod display;
pub mod metrics;
