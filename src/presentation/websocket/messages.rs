//! WebSocket Message Types
//!
//! Gateway frame formats for the attribute channel protocol.

use serde::{Deserialize, Serialize};

use crate::domain::channel::{ChannelId, ChannelSpec};

/// Gateway opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Server push of a device event
    Dispatch = 0,
    /// Server greeting after connect
    Hello = 1,
    /// Client request for a channel value
    Read = 2,
    /// Server reply to a read
    ReadResult = 3,
    /// Client write to a channel
    Write = 4,
    /// Server confirmation of an applied write
    WriteAck = 5,
    /// Client subscription to a channel's changes
    Subscribe = 6,
    /// Client subscription removal
    Unsubscribe = 7,
    /// Server confirmation of a subscription change
    Ack = 8,
    /// Server rejection of a request
    Error = 9,
}

impl OpCode {
    pub fn from_u8(op: u8) -> Option<OpCode> {
        match op {
            0 => Some(OpCode::Dispatch),
            1 => Some(OpCode::Hello),
            2 => Some(OpCode::Read),
            3 => Some(OpCode::ReadResult),
            4 => Some(OpCode::Write),
            5 => Some(OpCode::WriteAck),
            6 => Some(OpCode::Subscribe),
            7 => Some(OpCode::Unsubscribe),
            8 => Some(OpCode::Ack),
            9 => Some(OpCode::Error),
            _ => None,
        }
    }
}

/// Incoming gateway message
#[derive(Debug, Deserialize)]
pub struct GatewayReceive {
    pub op: u8,
    pub d: Option<serde_json::Value>,
}

/// Outgoing gateway message
#[derive(Debug, Clone, Serialize)]
pub struct GatewaySend {
    pub op: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

/// Hello payload (op 1)
#[derive(Debug, Serialize)]
pub struct HelloPayload {
    /// Advertised device name
    pub device: String,
    /// Cadence of periodic re-notification for subscribed channels
    pub refresh_interval_ms: u64,
    /// The full channel table
    pub channels: Vec<ChannelSpec>,
}

/// Read / Subscribe / Unsubscribe payload (ops 2, 6, 7)
#[derive(Debug, Deserialize)]
pub struct ChannelRequest {
    /// Channel name or attribute UUID
    pub channel: String,
}

/// Write payload (op 4)
#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub channel: String,
    pub value: String,
}

/// ReadResult / WriteAck payload (ops 3, 5)
#[derive(Debug, Serialize)]
pub struct ValuePayload {
    pub channel: ChannelId,
    pub value: String,
}

/// Ack payload (op 8)
#[derive(Debug, Serialize)]
pub struct AckPayload {
    pub channel: ChannelId,
    pub subscribed: bool,
}

/// Error payload (op 9)
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: u16,
    pub message: String,
}
