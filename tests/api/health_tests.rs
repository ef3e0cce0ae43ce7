//! Health Check API Tests

use axum::http::StatusCode;

use crate::common::{body_json, body_text, TestApp};

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn liveness_probe_returns_alive() {
    let app = TestApp::new();

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "alive");
}

#[tokio::test]
async fn readiness_probe_reports_device_detail() {
    let app = TestApp::new();

    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["gateway"]["active_connections"], 0);
    assert_eq!(json["device"]["battery_level"], 100);
    assert_eq!(json["device"]["session_status"], "Inactive");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_text() {
    let app = TestApp::new();

    // Generate at least one counted operation first.
    app.get("/api/v1/channels/status").await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("therapy_sim_channel_reads_total"));
}
