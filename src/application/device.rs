//! Virtual Device
//!
//! Binds the channel table to the live parts of the simulator. Every
//! transport (HTTP, gateway) resolves a channel id and comes through
//! the one read path and the one write path here.

use std::sync::Arc;

use crate::application::battery_monitor::BatteryMonitor;
use crate::application::clock::Clock;
use crate::application::controller::TherapyController;
use crate::domain::channel::ChannelId;
use crate::domain::device_info::DeviceInfo;
use crate::infrastructure::display::DisplayPort;
use crate::infrastructure::metrics;
use crate::presentation::websocket::gateway::NotificationHub;
use crate::shared::error::AppError;

pub struct VirtualDevice {
    controller: TherapyController,
    battery: BatteryMonitor,
    info: DeviceInfo,
}

impl VirtualDevice {
    pub fn new(
        info: DeviceInfo,
        initial_battery: u8,
        clock: Arc<dyn Clock>,
        hub: Arc<NotificationHub>,
        display: Arc<dyn DisplayPort>,
    ) -> Self {
        display.update_device_info(&info);

        Self {
            controller: TherapyController::new(clock, hub.clone(), display.clone()),
            battery: BatteryMonitor::new(initial_battery, hub, display),
            info,
        }
    }

    pub fn controller(&self) -> &TherapyController {
        &self.controller
    }

    pub fn battery(&self) -> &BatteryMonitor {
        &self.battery
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Read the current textual value of a channel.
    ///
    /// Reads never fail; reading the elapsed channel while idle re-arms
    /// the session reference point as a side effect.
    pub fn read(&self, channel: ChannelId) -> String {
        metrics::record_channel_read(channel.name());

        match channel {
            ChannelId::ElapsedSeconds => self.controller.elapsed_secs().to_string(),
            ChannelId::Intensity => self.controller.intensity().to_string(),
            ChannelId::TargetDuration => self.controller.target_secs().to_string(),
            ChannelId::Status => self.controller.status().as_str().to_owned(),
            ChannelId::Timestamp => self.controller.timestamp(),
            ChannelId::UserId => self.controller.user_id(),
            ChannelId::DeviceId => self.info.device_id.clone(),
            ChannelId::Location => self.info.location_hex(),
            ChannelId::BatteryLevel => self.battery.level().to_string(),
            ChannelId::FirmwareVersion => self.info.firmware_version.clone(),
        }
    }

    /// Apply a write to a channel. Returns the stored value on success.
    pub fn write(&self, channel: ChannelId, payload: &[u8]) -> Result<String, AppError> {
        let result = match channel {
            ChannelId::Intensity => self
                .controller
                .set_intensity(payload)
                .map(|value| value.to_string()),
            ChannelId::TargetDuration => self
                .controller
                .set_target_duration(payload)
                .map(|value| value.to_string()),
            ChannelId::UserId => self
                .controller
                .set_user_id(payload)
                .map(|_| self.controller.user_id()),
            ChannelId::Timestamp => self
                .controller
                .set_timestamp(payload)
                .map(|_| self.controller.timestamp()),
            other => Err(AppError::NotWritable(other)),
        };

        match &result {
            Ok(_) => metrics::record_channel_write(channel.name(), true),
            Err(error) => {
                metrics::record_channel_write(channel.name(), false);
                tracing::warn!(channel = %channel, error = %error, "channel write rejected");
            }
        }

        result
    }
}
