//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Channel read/write counts, writes split by outcome
//! - Session lifecycle counters (started, completed)
//! - Notification fan-out counts by event type
//! - Active gateway connection gauge
//! - Simulated battery level gauge

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Channel read counter - tracks reads by channel name
pub static CHANNEL_READS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("channel_reads_total", "Total number of channel reads").namespace("therapy_sim"),
        &["channel"],
    )
    .expect("Failed to create CHANNEL_READS_TOTAL metric")
});

/// Channel write counter - tracks writes by channel name and outcome
pub static CHANNEL_WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("channel_writes_total", "Total number of channel writes").namespace("therapy_sim"),
        &["channel", "outcome"], // "accepted", "rejected"
    )
    .expect("Failed to create CHANNEL_WRITES_TOTAL metric")
});

/// Sessions started counter
pub static SESSIONS_STARTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("sessions_started_total", "Total number of therapy sessions started")
            .namespace("therapy_sim"),
    )
    .expect("Failed to create SESSIONS_STARTED_TOTAL metric")
});

/// Sessions completed counter
pub static SESSIONS_COMPLETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "sessions_completed_total",
            "Total number of therapy sessions run to completion",
        )
        .namespace("therapy_sim"),
    )
    .expect("Failed to create SESSIONS_COMPLETED_TOTAL metric")
});

/// Notification counter - tracks published device events by type
pub static NOTIFICATIONS_PUBLISHED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "notifications_published_total",
            "Total number of device events published to the gateway",
        )
        .namespace("therapy_sim"),
        &["event"],
    )
    .expect("Failed to create NOTIFICATIONS_PUBLISHED_TOTAL metric")
});

/// Active gateway connections gauge
pub static GATEWAY_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "gateway_connections_active",
            "Number of active gateway connections",
        )
        .namespace("therapy_sim"),
    )
    .expect("Failed to create GATEWAY_CONNECTIONS_ACTIVE metric")
});

/// Simulated battery level gauge
pub static BATTERY_LEVEL: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("battery_level", "Current simulated battery level in percent")
            .namespace("therapy_sim"),
    )
    .expect("Failed to create BATTERY_LEVEL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CHANNEL_READS_TOTAL.clone()))
        .expect("Failed to register CHANNEL_READS_TOTAL");
    registry
        .register(Box::new(CHANNEL_WRITES_TOTAL.clone()))
        .expect("Failed to register CHANNEL_WRITES_TOTAL");
    registry
        .register(Box::new(SESSIONS_STARTED_TOTAL.clone()))
        .expect("Failed to register SESSIONS_STARTED_TOTAL");
    registry
        .register(Box::new(SESSIONS_COMPLETED_TOTAL.clone()))
        .expect("Failed to register SESSIONS_COMPLETED_TOTAL");
    registry
        .register(Box::new(NOTIFICATIONS_PUBLISHED_TOTAL.clone()))
        .expect("Failed to register NOTIFICATIONS_PUBLISHED_TOTAL");
    registry
        .register(Box::new(GATEWAY_CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register GATEWAY_CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(BATTERY_LEVEL.clone()))
        .expect("Failed to register BATTERY_LEVEL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record a channel read
pub fn record_channel_read(channel: &str) {
    CHANNEL_READS_TOTAL.with_label_values(&[channel]).inc();
}

/// Helper to record a channel write and its outcome
pub fn record_channel_write(channel: &str, accepted: bool) {
    let outcome = if accepted { "accepted" } else { "rejected" };
    CHANNEL_WRITES_TOTAL
        .with_label_values(&[channel, outcome])
        .inc();
}

/// Helper to record a published device event
pub fn record_notification(event: &str) {
    NOTIFICATIONS_PUBLISHED_TOTAL
        .with_label_values(&[event])
        .inc();
}

pub fn record_session_started() {
    SESSIONS_STARTED_TOTAL.inc();
}

pub fn record_session_completed() {
    SESSIONS_COMPLETED_TOTAL.inc();
}

/// Helper to update the gateway connection count
pub fn set_gateway_connections(count: usize) {
    GATEWAY_CONNECTIONS_ACTIVE.set(count as i64);
}

/// Helper to update the battery level gauge
pub fn set_battery_level(level: u8) {
    BATTERY_LEVEL.set(level as i64);
}
