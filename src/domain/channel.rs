//! Channel Table
//!
//! Every externally observable value of the module is a channel: an
//! addressable textual attribute with optional write and notify
//! capability. The whole surface is one static table plus one dispatch
//! path; adding a channel means adding a row, not a type.

use std::fmt;

use serde::Serialize;
use uuid::{uuid, Uuid};

/// The attribute groups the module advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Session control and progress attributes.
    TherapyControl,
    /// Static identity and health attributes.
    ModuleInfo,
}

impl ServiceKind {
    pub fn uuid(self) -> Uuid {
        match self {
            ServiceKind::TherapyControl => uuid!("00000001-710e-4a5b-8d75-3e5b444bc3cf"),
            ServiceKind::ModuleInfo => uuid!("00000011-710e-4a5b-8d75-3e5b444bc3cf"),
        }
    }
}

/// Identifier for a single channel.
///
/// Variant order matches [`CHANNELS`]; the discriminant doubles as the
/// table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelId {
    ElapsedSeconds,
    Intensity,
    TargetDuration,
    Status,
    Timestamp,
    UserId,
    DeviceId,
    Location,
    BatteryLevel,
    FirmwareVersion,
}

/// One row of the channel table.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSpec {
    pub id: ChannelId,
    pub uuid: Uuid,
    pub service: ServiceKind,
    /// Human-readable descriptor, as the physical module reports it.
    pub description: &'static str,
    pub writable: bool,
    pub notifiable: bool,
}

/// The complete channel table.
pub const CHANNELS: [ChannelSpec; 10] = [
    ChannelSpec {
        id: ChannelId::ElapsedSeconds,
        uuid: uuid!("00000002-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::TherapyControl,
        description: "Time Elapsed (Seconds)",
        writable: false,
        notifiable: true,
    },
    ChannelSpec {
        id: ChannelId::Intensity,
        uuid: uuid!("00000003-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::TherapyControl,
        description: "Intensity (%)",
        writable: true,
        notifiable: true,
    },
    ChannelSpec {
        id: ChannelId::TargetDuration,
        uuid: uuid!("00000004-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::TherapyControl,
        description: "Target Time (Seconds)",
        writable: true,
        notifiable: true,
    },
    ChannelSpec {
        id: ChannelId::Status,
        uuid: uuid!("00000005-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::TherapyControl,
        description: "Session Status",
        writable: false,
        notifiable: true,
    },
    ChannelSpec {
        id: ChannelId::Timestamp,
        uuid: uuid!("00000006-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::TherapyControl,
        description: "Timestamp (DD:MM:YYYYTHH:MM:SS)",
        writable: true,
        notifiable: false,
    },
    ChannelSpec {
        id: ChannelId::UserId,
        uuid: uuid!("00000007-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::TherapyControl,
        description: "User ID",
        writable: true,
        notifiable: false,
    },
    ChannelSpec {
        id: ChannelId::DeviceId,
        uuid: uuid!("00000012-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::ModuleInfo,
        description: "Device ID",
        writable: false,
        notifiable: false,
    },
    ChannelSpec {
        id: ChannelId::Location,
        uuid: uuid!("00000013-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::ModuleInfo,
        description: "Location Code",
        writable: false,
        notifiable: false,
    },
    ChannelSpec {
        id: ChannelId::BatteryLevel,
        uuid: uuid!("00000014-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::ModuleInfo,
        description: "Battery Life (%)",
        writable: false,
        notifiable: true,
    },
    ChannelSpec {
        id: ChannelId::FirmwareVersion,
        uuid: uuid!("00000015-710e-4a5b-8d75-3e5b444bc3cf"),
        service: ServiceKind::ModuleInfo,
        description: "Firmware Version",
        writable: false,
        notifiable: false,
    },
];

impl ChannelId {
    /// All channels, in table order.
    pub const ALL: [ChannelId; 10] = [
        ChannelId::ElapsedSeconds,
        ChannelId::Intensity,
        ChannelId::TargetDuration,
        ChannelId::Status,
        ChannelId::Timestamp,
        ChannelId::UserId,
        ChannelId::DeviceId,
        ChannelId::Location,
        ChannelId::BatteryLevel,
        ChannelId::FirmwareVersion,
    ];

    /// The table row for this channel.
    pub fn spec(self) -> &'static ChannelSpec {
        &CHANNELS[self as usize]
    }

    /// Canonical textual name, as used in URLs and gateway frames.
    pub fn name(self) -> &'static str {
        match self {
            ChannelId::ElapsedSeconds => "elapsed_seconds",
            ChannelId::Intensity => "intensity",
            ChannelId::TargetDuration => "target_duration",
            ChannelId::Status => "status",
            ChannelId::Timestamp => "timestamp",
            ChannelId::UserId => "user_id",
            ChannelId::DeviceId => "device_id",
            ChannelId::Location => "location",
            ChannelId::BatteryLevel => "battery_level",
            ChannelId::FirmwareVersion => "firmware_version",
        }
    }

    pub fn uuid(self) -> Uuid {
        self.spec().uuid
    }

    pub fn is_writable(self) -> bool {
        self.spec().writable
    }

    pub fn is_notifiable(self) -> bool {
        self.spec().notifiable
    }

    /// Resolve a channel from its name or its attribute UUID.
    pub fn parse(input: &str) -> Option<ChannelId> {
        let trimmed = input.trim();

        if let Some(id) = ChannelId::ALL.iter().find(|id| id.name() == trimmed) {
            return Some(*id);
        }

        let uuid = Uuid::parse_str(trimmed).ok()?;
        ChannelId::ALL.iter().find(|id| id.uuid() == uuid).copied()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
