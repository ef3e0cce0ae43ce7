//! Application Layer
//!
//! Orchestrates the simulator: the session controller, the battery
//! monitor, and the channel dispatch that binds them to the channel
//! table. Time enters this layer only through the `Clock` seam.

pub mod battery_monitor;
pub mod clock;
pub mod controller;
pub mod device;

pub use battery_monitor::BatteryMonitor;
pub use clock::{Clock, SystemClock};
pub use controller::{SessionSnapshot, TherapyController};
pub use device::VirtualDevice;
