//! Device Handlers
//!
//! Request handlers for device identity and the session view.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::application::controller::SessionSnapshot;
use crate::domain::channel::ServiceKind;
use crate::startup::AppState;

/// Device identity response
#[derive(Debug, Serialize)]
pub struct DeviceInfoResponse {
    pub name: String,
    pub device_id: String,
    pub location: String,
    pub firmware_version: String,
    /// Attribute groups the device advertises
    pub services: Vec<ServiceInfo>,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub kind: ServiceKind,
    pub uuid: Uuid,
}

/// GET /api/v1/device
pub async fn get_device_info(State(state): State<AppState>) -> Json<DeviceInfoResponse> {
    let info = state.device.info();

    Json(DeviceInfoResponse {
        name: info.name.clone(),
        device_id: info.device_id.clone(),
        location: info.location_hex(),
        firmware_version: info.firmware_version.clone(),
        services: [ServiceKind::TherapyControl, ServiceKind::ModuleInfo]
            .into_iter()
            .map(|kind| ServiceInfo {
                kind,
                uuid: kind.uuid(),
            })
            .collect(),
    })
}

/// GET /api/v1/session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.device.controller().snapshot())
}
