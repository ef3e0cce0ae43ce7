//! Channel API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn list_channels_returns_full_table() {
    let app = TestApp::new();

    let response = app.get("/api/v1/channels").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let channels = json.as_array().expect("channel list");
    assert_eq!(channels.len(), 10);

    let intensity = channels
        .iter()
        .find(|c| c["id"] == "intensity")
        .expect("intensity channel");
    assert_eq!(intensity["writable"], true);
    assert_eq!(intensity["notifiable"], true);
    assert_eq!(
        intensity["uuid"],
        "00000003-710e-4a5b-8d75-3e5b444bc3cf"
    );

    let device_id = channels
        .iter()
        .find(|c| c["id"] == "device_id")
        .expect("device_id channel");
    assert_eq!(device_id["writable"], false);
    assert_eq!(device_id["notifiable"], false);
}

#[tokio::test]
async fn read_channel_returns_initial_values() {
    let app = TestApp::new();

    let response = app.get("/api/v1/channels/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["channel"], "status");
    assert_eq!(json["value"], "Inactive");

    let response = app.get("/api/v1/channels/battery_level").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "100");

    let response = app.get("/api/v1/channels/location").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "0x02");
}

#[tokio::test]
async fn read_channel_accepts_uuid_lookup() {
    let app = TestApp::new();

    let response = app
        .get("/api/v1/channels/00000005-710e-4a5b-8d75-3e5b444bc3cf")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["channel"], "status");
    assert_eq!(json["value"], "Inactive");
}

#[tokio::test]
async fn write_intensity_echoes_and_stores() {
    let app = TestApp::new();

    let response = app.put_text("/api/v1/channels/intensity", "30").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["channel"], "intensity");
    assert_eq!(json["value"], "30");

    let response = app.get("/api/v1/channels/intensity").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "30");
}

#[tokio::test]
async fn write_rejects_malformed_payload() {
    let app = TestApp::new();

    let response = app.put_text("/api/v1/channels/intensity", "thirty").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], 20001);

    // The rejected write must not leak into state.
    let response = app.get("/api/v1/channels/intensity").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "0");
}

#[tokio::test]
async fn unknown_channel_returns_not_found() {
    let app = TestApp::new();

    let response = app.get("/api/v1/channels/warp_core").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], 20002);
}

#[tokio::test]
async fn write_to_read_only_channel_is_rejected() {
    let app = TestApp::new();

    let response = app.put_text("/api/v1/channels/battery_level", "50").await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = body_json(response).await;
    assert_eq!(json["code"], 20003);

    let response = app.get("/api/v1/channels/battery_level").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "100");
}

#[tokio::test]
async fn metadata_channels_store_free_text() {
    let app = TestApp::new();

    let response = app.put_text("/api/v1/channels/user_id", "patient-42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .put_text("/api/v1/channels/timestamp", "2025-01-15T09:30")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/v1/channels/user_id").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "patient-42");

    let response = app.get("/api/v1/channels/timestamp").await;
    let json = body_json(response).await;
    assert_eq!(json["value"], "2025-01-15T09:30");
}

#[tokio::test]
async fn oversized_user_id_is_rejected() {
    let app = TestApp::new();
    let long = "x".repeat(51);

    let response = app.put_text("/api/v1/channels/user_id", &long).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], 20001);
}
