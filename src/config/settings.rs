//! Application settings and configuration structures.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Simulated device identity
    pub device: DeviceSettings,

    /// Background task cadence
    pub timers: TimerSettings,

    /// Simulated battery configuration
    pub battery: BatterySettings,

    /// Display sink configuration
    pub display: DisplaySettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Identity reported on the module info channels.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSettings {
    /// Advertised device name
    pub name: String,

    /// Hardware identifier
    pub device_id: String,

    /// Body location code
    pub location: u8,

    /// Firmware revision string
    pub firmware_version: String,
}

/// Cadence of the background tasks, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerSettings {
    /// Session reconciliation tick
    pub session_tick_ms: u64,

    /// Battery drain step
    pub battery_drain_ms: u64,

    /// Periodic re-notification of subscribed channels
    pub notify_refresh_ms: u64,
}

impl TimerSettings {
    pub fn session_tick(&self) -> Duration {
        Duration::from_millis(self.session_tick_ms)
    }

    pub fn battery_drain(&self) -> Duration {
        Duration::from_millis(self.battery_drain_ms)
    }

    pub fn notify_refresh(&self) -> Duration {
        Duration::from_millis(self.notify_refresh_ms)
    }
}

/// Simulated battery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BatterySettings {
    /// Starting level in percent (1-100)
    pub initial_level: u8,
}

/// Display sink configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySettings {
    /// Sink name: "log" or "off"
    pub mode: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if a timer or battery value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("device.name", "LM Health Virtual")?
            .set_default("device.device_id", "IR-VIR")?
            .set_default("device.location", 2)?
            .set_default("device.firmware_version", "1.0.0")?
            .set_default("timers.session_tick_ms", 1000_i64)?
            .set_default("timers.battery_drain_ms", 5000_i64)?
            .set_default("timers.notify_refresh_ms", 5000_i64)?
            .set_default("battery.initial_level", 100)?
            .set_default("display.mode", "log")?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("display.mode", std::env::var("DISPLAY_MODE").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate())
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(1..=100).contains(&self.battery.initial_level) {
            return Err(ConfigError::Message(format!(
                "battery.initial_level must be between 1 and 100, got {}",
                self.battery.initial_level
            )));
        }

        for (name, value) in [
            ("timers.session_tick_ms", self.timers.session_tick_ms),
            ("timers.battery_drain_ms", self.timers.battery_drain_ms),
            ("timers.notify_refresh_ms", self.timers.notify_refresh_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Message(format!("{} must be non-zero", name)));
            }
        }

        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerSettings {
    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid server address configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 3000,
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

    #[test]
    fn validate_accepts_sane_settings() {
        assert!(base_settings().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_battery() {
        let mut settings = base_settings();
        settings.battery.initial_level = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timers() {
        let mut settings = base_settings();
        settings.timers.session_tick_ms = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn timer_durations_convert_from_millis() {
        let settings = base_settings();
        assert_eq!(settings.timers.session_tick(), Duration::from_secs(1));
        assert_eq!(settings.timers.notify_refresh(), Duration::from_secs(5));
    }
}
