//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use tower::ServiceExt;

use therapy_sim::application::clock::SystemClock;
use therapy_sim::application::device::VirtualDevice;
use therapy_sim::config::{
    BatterySettings, CorsSettings, DeviceSettings, DisplaySettings, ServerSettings, Settings,
    TimerSettings,
};
use therapy_sim::domain::device_info::DeviceInfo;
use therapy_sim::infrastructure::display::NullDisplay;
use therapy_sim::presentation::http::routes;
use therapy_sim::presentation::websocket::gateway::NotificationHub;
use therapy_sim::startup::AppState;

/// Settings for a test instance. No config files or environment
/// variables are consulted.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        device: DeviceSettings {
            name: "LM Health Virtual".into(),
            device_id: "IR-VIR".into(),
            location: 2,
            firmware_version: "1.0.0".into(),
        },
        timers: TimerSettings {
            session_tick_ms: 1000,
            battery_drain_ms: 5000,
            notify_refresh_ms: 5000,
        },
        battery: BatterySettings { initial_level: 100 },
        display: DisplaySettings { mode: "off".into() },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        environment: "test".into(),
    }
}

/// Test application wrapping a real router over a fresh device.
///
/// Background tasks are not spawned; tests drive session ticks through
/// the controller directly when they need time to pass.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let settings = test_settings();
        let hub = Arc::new(NotificationHub::new());
        let info = DeviceInfo {
            name: settings.device.name.clone(),
            device_id: settings.device.device_id.clone(),
            location: settings.device.location,
            firmware_version: settings.device.firmware_version.clone(),
        };
        let device = Arc::new(VirtualDevice::new(
            info,
            settings.battery.initial_level,
            Arc::new(SystemClock),
            hub.clone(),
            Arc::new(NullDisplay),
        ));

        let state = AppState {
            device,
            hub,
            settings: Arc::new(settings),
        };
        let router = routes::create_router(state.clone());

        Self { router, state }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a PUT request with a raw textual payload
    pub async fn put_text(&self, uri: &str, body: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header("Content-Type", "text/plain")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
