//! Display Adapters
//!
//! The physical module drives a small status panel; the simulator pushes
//! the same updates through [`DisplayPort`]. The port is injected into
//! the application layer, so headless runs swap in the no-op sink and
//! tests swap in a mock. Implementations must return quickly and never
//! block the caller.

use crate::domain::device_info::DeviceInfo;

/// Snapshot of the session panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub intensity: u32,
    pub target_secs: u64,
    pub user_id: String,
    pub timestamp: String,
    pub active: bool,
}

impl StatusView {
    /// Panel label: a session under way shows `ACTIVE`, a half-configured
    /// one `WAITING`, everything else `INACTIVE`.
    pub fn label(&self) -> &'static str {
        if self.active {
            "ACTIVE"
        } else if self.intensity > 0 || self.target_secs > 0 {
            "WAITING"
        } else {
            "INACTIVE"
        }
    }
}

/// Outbound display surface of the device.
#[cfg_attr(test, mockall::automock)]
pub trait DisplayPort: Send + Sync {
    /// Battery panel update.
    fn update_battery(&self, percent: u8);

    /// Progress panel update; `elapsed_secs` is already capped at the
    /// target.
    fn update_progress(&self, elapsed_secs: u64, target_secs: u64);

    /// Session panel update.
    fn update_status(&self, view: &StatusView);

    /// Identity panel, drawn once at startup.
    fn update_device_info(&self, info: &DeviceInfo);

    /// Completion banner.
    fn session_completed(&self, target_secs: u64);
}

/// Sink that drops every update. Used for headless runs and most tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplayPort for NullDisplay {
    fn update_battery(&self, _percent: u8) {}
    fn update_progress(&self, _elapsed_secs: u64, _target_secs: u64) {}
    fn update_status(&self, _view: &StatusView) {}
    fn update_device_info(&self, _info: &DeviceInfo) {}
    fn session_completed(&self, _target_secs: u64) {}
}

/// Renders panel updates as structured log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

impl DisplayPort for LogDisplay {
    fn update_battery(&self, percent: u8) {
        tracing::info!(percent, "battery level");
    }

    fn update_progress(&self, elapsed_secs: u64, target_secs: u64) {
        tracing::info!(elapsed_secs, target_secs, "therapy progress");
    }

    fn update_status(&self, view: &StatusView) {
        tracing::info!(
            intensity = view.intensity,
            target_secs = view.target_secs,
            user_id = %view.user_id,
            timestamp = %view.timestamp,
            state = view.label(),
            "therapy status"
        );
    }

    fn update_device_info(&self, info: &DeviceInfo) {
        tracing::info!(
            name = %info.name,
            device_id = %info.device_id,
            location = %info.location_hex(),
            firmware = %info.firmware_version,
            "device info"
        );
    }

    fn session_completed(&self, target_secs: u64) {
        tracing::info!(target_secs, "therapy complete");
    }
}

/// Select a display implementation by configuration name.
///
/// Unknown names fall back to the log display.
pub fn from_mode(mode: &str) -> std::sync::Arc<dyn DisplayPort> {
    match mode {
        "off" => std::sync::Arc::new(NullDisplay),
        "log" => std::sync::Arc::new(LogDisplay),
        other => {
            tracing::warn!(mode = other, "unknown display mode, using log display");
            std::sync::Arc::new(LogDisplay)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_reflects_session_phase() {
        let mut view = StatusView {
            intensity: 0,
            target_secs: 0,
            user_id: String::new(),
            timestamp: String::new(),
            active: false,
        };
        assert_eq!(view.label(), "INACTIVE");

        view.intensity = 30;
        assert_eq!(view.label(), "WAITING");

        view.active = true;
        assert_eq!(view.label(), "ACTIVE");
    }
}
