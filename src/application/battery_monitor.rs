//! Battery Monitor
//!
//! Owns the simulated battery and applies the periodic drain, pushing
//! the new level to the gateway, the metrics gauge, and the display.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::battery::Battery;
use crate::domain::channel::ChannelId;
use crate::infrastructure::display::DisplayPort;
use crate::infrastructure::metrics;
use crate::presentation::websocket::gateway::NotificationHub;

pub struct BatteryMonitor {
    battery: Mutex<Battery>,
    hub: Arc<NotificationHub>,
    display: Arc<dyn DisplayPort>,
}

impl BatteryMonitor {
    pub fn new(initial_level: u8, hub: Arc<NotificationHub>, display: Arc<dyn DisplayPort>) -> Self {
        let battery = Battery::new(initial_level);
        metrics::set_battery_level(battery.level());
        display.update_battery(battery.level());

        Self {
            battery: Mutex::new(battery),
            hub,
            display,
        }
    }

    pub fn level(&self) -> u8 {
        self.battery.lock().level()
    }

    /// One drain step, driven on the battery cadence.
    pub fn drain_tick(&self) {
        let level = self.battery.lock().drain();

        metrics::set_battery_level(level);
        self.hub.publish(ChannelId::BatteryLevel, level.to_string());
        self.display.update_battery(level);

        tracing::debug!(level, "battery drained");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::display::NullDisplay;

    fn monitor(initial: u8) -> (BatteryMonitor, Arc<NotificationHub>) {
        let hub = Arc::new(NotificationHub::new());
        let monitor = BatteryMonitor::new(initial, hub.clone(), Arc::new(NullDisplay));
        (monitor, hub)
    }

    #[test]
    fn drain_publishes_the_new_level() {
        let (monitor, hub) = monitor(80);
        let mut rx = hub.subscribe_events();

        monitor.drain_tick();

        assert_eq!(monitor.level(), 79);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.channel(), Some(ChannelId::BatteryLevel));
        assert_eq!(event.to_json()["value"], "79");
    }

    #[test]
    fn drain_wraps_to_full() {
        let (monitor, _hub) = monitor(1);
        monitor.drain_tick();
        assert_eq!(monitor.level(), 100);
    }
}
