//! Health Check Handlers
//!
//! Provides health check endpoints for Kubernetes-style liveness and readiness probes.
//!
//! # Endpoints
//! - `GET /health` - Basic health check
//! - `GET /health/live` - Liveness probe (is the server running?)
//! - `GET /health/ready` - Readiness probe, with gateway and device detail

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Instant;

use crate::startup::AppState;

/// Server start time for uptime calculation
static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Initialize the server start time (call during startup)
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

/// Basic health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health check response
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub gateway: GatewayHealth,
    pub device: DeviceHealth,
}

/// WebSocket gateway health
#[derive(Debug, Serialize)]
pub struct GatewayHealth {
    pub active_connections: usize,
}

/// Simulated device health
#[derive(Debug, Serialize)]
pub struct DeviceHealth {
    pub battery_level: u8,
    pub session_status: String,
}

/// Simple liveness response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe - checks if the server is running
/// Returns 200 if alive, used by Kubernetes to restart dead pods
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "alive" })
}

/// Readiness probe - the simulator carries no external dependencies, so
/// this reports detail rather than gating traffic
pub async fn readiness(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let uptime = SERVER_START.elapsed().as_secs();
    let started_at = SERVER_START_TIME.to_rfc3339();

    Json(DetailedHealthResponse {
        status: "ready",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime,
        started_at,
        gateway: GatewayHealth {
            active_connections: state.hub.connection_count(),
        },
        device: DeviceHealth {
            battery_level: state.device.battery().level(),
            session_status: state.device.controller().status().as_str().to_owned(),
        },
    })
}
