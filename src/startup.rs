//! Application Startup
//!
//! Application building, background task spawning, and server
//! initialization.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::time::interval;

use crate::application::clock::SystemClock;
use crate::application::device::VirtualDevice;
use crate::config::Settings;
use crate::domain::channel::ChannelId;
use crate::domain::device_info::DeviceInfo;
use crate::infrastructure::display;
use crate::presentation::http::routes;
use crate::presentation::http::handlers::health::init_server_start;
use crate::presentation::middleware::{cors, logging};
use crate::presentation::websocket::gateway::NotificationHub;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub device: Arc<VirtualDevice>,
    pub hub: Arc<NotificationHub>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        init_server_start();

        // Create the notification hub and the device behind it
        let hub = Arc::new(NotificationHub::new());
        let display = display::from_mode(&settings.display.mode);
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
            display,
        ));
        tracing::info!(
            name = %settings.device.name,
            device_id = %settings.device.device_id,
            "Virtual device created"
        );

        // Create app state
        let state = AppState {
            device,
            hub,
            settings: Arc::new(settings.clone()),
        };

        // Start the periodic device tasks
        spawn_background_tasks(&state);

        // Build router with middleware
        let router = routes::create_router(state.clone())
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr = settings.server.socket_addr();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }
}

/// Spawn the periodic device tasks: session reconciliation, battery
/// drain, and re-notification of subscribed channels.
fn spawn_background_tasks(state: &AppState) {
    // Session reconciliation tick
    {
        let device = state.device.clone();
        let period = state.settings.timers.session_tick();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.tick().await; // Skip first immediate tick
            loop {
                ticker.tick().await;
                device.controller().tick();
            }
        });
    }

    // Battery drain
    {
        let device = state.device.clone();
        let period = state.settings.timers.battery_drain();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.tick().await; // Skip first immediate tick
            loop {
                ticker.tick().await;
                device.battery().drain_tick();
            }
        });
    }

    // Periodic re-notification of subscribed channels
    {
        let device = state.device.clone();
        let hub = state.hub.clone();
        let period = state.settings.timers.notify_refresh();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.tick().await; // Skip first immediate tick
            loop {
                ticker.tick().await;
                refresh_subscribed_channels(&device, &hub);
            }
        });
    }
}

/// Re-publish the current value of every notifiable channel somebody
/// subscribed to. Reading the elapsed channel here doubles as the idle
/// reconciliation the read path performs.
fn refresh_subscribed_channels(device: &VirtualDevice, hub: &NotificationHub) {
    for channel in ChannelId::ALL {
        if channel.is_notifiable() && hub.has_subscribers(channel) {
            let value = device.read(channel);
            hub.publish(channel, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use uuid::Uuid;

    use super::*;
    use crate::config::{
        BatterySettings, CorsSettings, DeviceSettings, DisplaySettings, ServerSettings,
        TimerSettings,
    };
    use crate::infrastructure::display::NullDisplay;

    fn test_device(hub: Arc<NotificationHub>) -> Arc<VirtualDevice> {
        let info = DeviceInfo {
            name: "LM Health Virtual".into(),
            device_id: "IR-VIR".into(),
            location: 2,
            firmware_version: "1.0.0".into(),
        };
        Arc::new(VirtualDevice::new(
            info,
            100,
            Arc::new(SystemClock),
            hub,
            Arc::new(NullDisplay),
        ))
    }

    #[tokio::test]
    async fn refresh_republishes_only_subscribed_channels() {
        let hub = Arc::new(NotificationHub::new());
        let device = test_device(hub.clone());

        let conn_id = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();
        hub.register(conn_id, tx);
        hub.subscribe(conn_id, ChannelId::BatteryLevel);
        hub.subscribe(conn_id, ChannelId::Status);

        let mut events = hub.subscribe_events();
        refresh_subscribed_channels(&device, &hub);

        let mut republished = Vec::new();
        while let Ok(event) = events.try_recv() {
            republished.push(event.channel().unwrap());
        }

        assert_eq!(
            republished,
            vec![ChannelId::Status, ChannelId::BatteryLevel]
        );
    }

    #[tokio::test]
    async fn refresh_without_subscribers_is_silent() {
        let hub = Arc::new(NotificationHub::new());
        let device = test_device(hub.clone());

        let mut events = hub.subscribe_events();
        refresh_subscribed_channels(&device, &hub);

        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn battery_drains_on_its_configured_cadence() {
        let hub = Arc::new(NotificationHub::new());
        let device = test_device(hub.clone());
        let settings = Settings {
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
        };
        let state = AppState {
            device: device.clone(),
            hub,
            settings: Arc::new(settings),
        };

        spawn_background_tasks(&state);

        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(device.battery().level(), 99);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(device.battery().level(), 98);
    }
}
