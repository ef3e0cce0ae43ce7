//! Session Lifecycle API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn device_info_reports_configured_module() {
    let app = TestApp::new();

    let response = app.get("/api/v1/device").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "LM Health Virtual");
    assert_eq!(json["device_id"], "IR-VIR");
    assert_eq!(json["location"], "0x02");
    assert_eq!(json["firmware_version"], "1.0.0");
    assert_eq!(json["services"][0]["kind"], "therapy_control");
    assert_eq!(
        json["services"][0]["uuid"],
        "00000001-710e-4a5b-8d75-3e5b444bc3cf"
    );
    assert_eq!(json["services"][1]["kind"], "module_info");
}

#[tokio::test]
async fn session_snapshot_starts_inactive() {
    let app = TestApp::new();

    let response = app.get("/api/v1/session").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "Inactive");
    assert_eq!(json["intensity"], 0);
    assert_eq!(json["target_secs"], 0);
    assert_eq!(json["elapsed_secs"], 0);
}

#[tokio::test]
async fn writing_both_thresholds_activates_session() {
    let app = TestApp::new();

    app.put_text("/api/v1/channels/intensity", "30").await;
    let response = app.get("/api/v1/session").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "Inactive");

    app.put_text("/api/v1/channels/target_duration", "300").await;
    let response = app.get("/api/v1/session").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "Active");
    assert_eq!(json["intensity"], 30);
    assert_eq!(json["target_secs"], 300);
}

#[tokio::test]
async fn status_channel_tracks_session() {
    let app = TestApp::new();

    app.put_text("/api/v1/channels/target_duration", "120").await;
    app.put_text("/api/v1/channels/intensity", "45").await;

    let response = app.get("/api/v1/channels/status").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "Active");

    // A zero write parks the threshold without ending the session.
    app.put_text("/api/v1/channels/intensity", "0").await;
    let response = app.get("/api/v1/channels/status").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "Active");

    // The next write sees a zero counterpart and drops to idle.
    app.put_text("/api/v1/channels/target_duration", "60").await;
    let response = app.get("/api/v1/channels/status").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "Inactive");
}

#[tokio::test]
async fn completion_resets_thresholds_over_http() {
    let app = TestApp::new();

    app.put_text("/api/v1/channels/intensity", "30").await;
    app.put_text("/api/v1/channels/target_duration", "0").await;
    let response = app.get("/api/v1/session").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "Inactive");

    app.put_text("/api/v1/channels/target_duration", "300").await;
    let response = app.get("/api/v1/session").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "Active");

    // Zero target while active completes on the next tick.
    app.put_text("/api/v1/channels/target_duration", "0").await;
    app.state.device.controller().tick();

    let response = app.get("/api/v1/session").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "Inactive");
    assert_eq!(json["intensity"], 0);
    assert_eq!(json["target_secs"], 0);
}

#[tokio::test]
async fn elapsed_read_stays_zero_while_idle() {
    let app = TestApp::new();

    let response = app.get("/api/v1/channels/elapsed_seconds").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "0");

    app.put_text("/api/v1/channels/intensity", "10").await;
    let response = app.get("/api/v1/channels/elapsed_seconds").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "0");
}

#[tokio::test]
async fn metadata_survives_session_lifecycle() {
    let app = TestApp::new();

    app.put_text("/api/v1/channels/user_id", "patient-7").await;
    app.put_text("/api/v1/channels/intensity", "20").await;
    app.put_text("/api/v1/channels/target_duration", "300").await;
    app.put_text("/api/v1/channels/target_duration", "0").await;
    app.state.device.controller().tick();

    let response = app.get("/api/v1/session").await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "Inactive");
    assert_eq!(json["intensity"], 0);
    assert_eq!(json["user_id"], "patient-7");
}
