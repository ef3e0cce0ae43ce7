//! Device Identity
//!
//! Static identity attributes the module reports on its info channels.

/// Fixed identity of the simulated module.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Advertised device name.
    pub name: String,
    /// Hardware identifier, e.g. `IR-VIR`.
    pub device_id: String,
    /// Body location code.
    pub location: u8,
    /// Firmware revision string.
    pub firmware_version: String,
}

impl DeviceInfo {
    /// Location code in the `0xNN` form the location channel reports.
    pub fn location_hex(&self) -> String {
        format!("0x{:02X}", self.location)
    }
}
