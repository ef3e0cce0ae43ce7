//! Notification Hub
//!
//! Fans device events out to gateway connections. The application layer
//! publishes here whenever a tracked value changes; connections receive
//! the stream through a broadcast channel and filter it against their
//! per-channel subscriptions.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::domain::channel::ChannelId;
use crate::infrastructure::metrics;

use super::messages::GatewaySend;

/// Device event types for internal fan-out
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t", content = "d")]
pub enum DeviceEvent {
    /// A channel's value changed. Routed to subscribers of that channel.
    #[serde(rename = "VALUE_CHANGED")]
    ValueChanged(ValueChangedEvent),

    /// A session began. Broadcast to every connection.
    #[serde(rename = "SESSION_STARTED")]
    SessionStarted(SessionStartedEvent),

    /// A session ran to completion. Broadcast to every connection.
    #[serde(rename = "SESSION_COMPLETED")]
    SessionCompleted(SessionCompletedEvent),
}

impl DeviceEvent {
    /// Get the event name for dispatch
    pub fn event_name(&self) -> &'static str {
        match self {
            DeviceEvent::ValueChanged(_) => "VALUE_CHANGED",
            DeviceEvent::SessionStarted(_) => "SESSION_STARTED",
            DeviceEvent::SessionCompleted(_) => "SESSION_COMPLETED",
        }
    }

    /// The channel this event is scoped to (None = broadcast to all)
    pub fn channel(&self) -> Option<ChannelId> {
        match self {
            DeviceEvent::ValueChanged(e) => Some(e.channel),
            DeviceEvent::SessionStarted(_) | DeviceEvent::SessionCompleted(_) => None,
        }
    }

    /// Convert to JSON value for sending
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DeviceEvent::ValueChanged(e) => serde_json::to_value(e).unwrap_or_default(),
            DeviceEvent::SessionStarted(e) => serde_json::to_value(e).unwrap_or_default(),
            DeviceEvent::SessionCompleted(e) => serde_json::to_value(e).unwrap_or_default(),
        }
    }
}

// Event payload structs
#[derive(Debug, Clone, Serialize)]
pub struct ValueChangedEvent {
    pub channel: ChannelId,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStartedEvent {
    pub intensity: u32,
    pub target_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionCompletedEvent {
    pub target_secs: u64,
}

/// Connected gateway client with its message sender
pub struct Subscriber {
    pub conn_id: Uuid,
    pub sender: mpsc::UnboundedSender<GatewaySend>,
}

/// Notification hub managing all gateway connections
pub struct NotificationHub {
    /// Active connections by connection id
    connections: DashMap<Uuid, Arc<Subscriber>>,
    /// Channel to connection ids mapping (for value-change routing)
    channel_subs: DashMap<ChannelId, Vec<Uuid>>,
    /// Broadcast channel for device events
    event_tx: broadcast::Sender<DeviceEvent>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(1024);
        Self {
            connections: DashMap::new(),
            channel_subs: DashMap::new(),
            event_tx,
        }
    }

    /// Subscribe to the device event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_tx.subscribe()
    }

    /// Register a new connection
    pub fn register(&self, conn_id: Uuid, sender: mpsc::UnboundedSender<GatewaySend>) {
        let subscriber = Arc::new(Subscriber { conn_id, sender });
        self.connections.insert(conn_id, subscriber);
        metrics::set_gateway_connections(self.connections.len());

        tracing::info!(conn_id = %conn_id, "Gateway connection registered");
    }

    /// Unregister a connection and drop all its channel subscriptions
    pub fn unregister(&self, conn_id: Uuid) {
        if self.connections.remove(&conn_id).is_some() {
            for mut subs in self.channel_subs.iter_mut() {
                subs.value_mut().retain(|id| *id != conn_id);
            }
            metrics::set_gateway_connections(self.connections.len());

            tracing::info!(conn_id = %conn_id, "Gateway connection unregistered");
        }
    }

    /// Add a channel subscription for a connection
    pub fn subscribe(&self, conn_id: Uuid, channel: ChannelId) {
        let mut subs = self.channel_subs.entry(channel).or_default();
        if !subs.contains(&conn_id) {
            subs.push(conn_id);
        }

        tracing::debug!(conn_id = %conn_id, channel = %channel, "Channel subscribed");
    }

    /// Remove a channel subscription from a connection
    pub fn unsubscribe(&self, conn_id: Uuid, channel: ChannelId) {
        if let Some(mut subs) = self.channel_subs.get_mut(&channel) {
            subs.retain(|id| *id != conn_id);
        }

        tracing::debug!(conn_id = %conn_id, channel = %channel, "Channel unsubscribed");
    }

    /// Send a frame to one connection. Returns false when it is gone.
    pub fn send_to(&self, conn_id: Uuid, frame: GatewaySend) -> bool {
        match self.connections.get(&conn_id) {
            Some(subscriber) => subscriber.sender.send(frame).is_ok(),
            None => false,
        }
    }

    /// Check whether a connection subscribed to a channel
    pub fn is_subscribed(&self, conn_id: Uuid, channel: ChannelId) -> bool {
        self.channel_subs
            .get(&channel)
            .map(|subs| subs.contains(&conn_id))
            .unwrap_or(false)
    }

    /// Check whether any connection subscribed to a channel
    pub fn has_subscribers(&self, channel: ChannelId) -> bool {
        self.channel_subs
            .get(&channel)
            .map(|subs| !subs.is_empty())
            .unwrap_or(false)
    }

    /// Publish a value change for a channel
    pub fn publish(&self, channel: ChannelId, value: String) {
        self.dispatch(DeviceEvent::ValueChanged(ValueChangedEvent {
            channel,
            value,
        }));
    }

    /// Publish a session start
    pub fn session_started(&self, intensity: u32, target_secs: u64) {
        self.dispatch(DeviceEvent::SessionStarted(SessionStartedEvent {
            intensity,
            target_secs,
        }));
    }

    /// Publish a session completion
    pub fn session_completed(&self, target_secs: u64) {
        self.dispatch(DeviceEvent::SessionCompleted(SessionCompletedEvent {
            target_secs,
        }));
    }

    /// Broadcast an event to all listening connections
    pub fn dispatch(&self, event: DeviceEvent) {
        metrics::record_notification(event.event_name());
        // No receivers just means nobody is connected
        let _ = self.event_tx.send(event);
    }

    /// Get connection count
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
