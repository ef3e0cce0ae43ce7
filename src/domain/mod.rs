//! # Domain Layer
//!
//! Core model of the virtual therapy module, independent of transport
//! and infrastructure concerns.
//!
//! ## Structure
//!
//! - **channel**: The static channel table (UUIDs, descriptors, capabilities)
//! - **session**: Session state and status
//! - **battery**: Simulated battery model
//! - **device_info**: Static device identity

pub mod battery;
pub mod channel;
pub mod device_info;
pub mod session;

// Re-export commonly used types
pub use battery::Battery;
pub use channel::{ChannelId, ChannelSpec, ServiceKind, CHANNELS};
pub use device_info::DeviceInfo;
pub use session::{SessionState, SessionStatus};
