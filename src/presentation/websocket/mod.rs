//! WebSocket Gateway
//!
//! Real-time attribute channel access over WebSocket connections.

pub mod connection;
pub mod gateway;
pub mod handler;
pub mod messages;

pub use connection::ConnectionState;
pub use gateway::{DeviceEvent, NotificationHub};
pub use handler::ws_handler;
pub use messages::{GatewayReceive, GatewaySend, OpCode};
