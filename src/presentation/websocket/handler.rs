//! WebSocket Connection Handler
//!
//! Handles individual gateway connections: the greeting, the
//! read/write/subscribe request loop, and the event fan-out filtered by
//! this connection's subscriptions.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use super::connection::ConnectionState;
use super::gateway::{NotificationHub, ValueChangedEvent};
use super::messages::{
    AckPayload, ChannelRequest, ErrorPayload, GatewayReceive, GatewaySend, HelloPayload, OpCode,
    ValuePayload, WriteRequest,
};
use crate::application::device::VirtualDevice;
use crate::domain::channel::{ChannelId, CHANNELS};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual gateway connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    let mut conn = ConnectionState::new(conn_id);

    tracing::debug!(conn_id = %conn_id, "New gateway connection");

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<GatewaySend>();

    // Send Hello message immediately
    let hello = GatewaySend {
        op: OpCode::Hello as u8,
        d: Some(
            serde_json::to_value(HelloPayload {
                device: state.settings.device.name.clone(),
                refresh_interval_ms: state.settings.timers.notify_refresh_ms,
                channels: CHANNELS.to_vec(),
            })
            .unwrap_or_default(),
        ),
        s: None,
        t: None,
    };

    if let Err(e) = sender
        .send(Message::Text(
            serde_json::to_string(&hello).unwrap_or_default().into(),
        ))
        .await
    {
        tracing::error!("Failed to send Hello: {}", e);
        return;
    }

    // Spawn task to forward messages from channel to WebSocket
    let sender_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Register connection with the hub
    state.hub.register(conn_id, tx.clone());

    // Subscribe to device events
    let mut event_rx = state.hub.subscribe_events();

    // Main message loop
    loop {
        tokio::select! {
            // Handle incoming messages
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = handle_frame(
                            &text,
                            &mut conn,
                            &tx,
                            &state.device,
                            &state.hub,
                        ) {
                            tracing::debug!(
                                conn_id = %conn_id,
                                error = %e,
                                "Error handling frame"
                            );
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(conn_id = %conn_id, "Connection closed");
                        break;
                    }
                    Some(Ok(Message::Ping(_))) => {
                        // Pong is handled automatically by axum
                    }
                    Some(Err(e)) => {
                        tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }

            // Fan out device events to this connection
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        // Channel-scoped events only go to subscribers
                        let should_receive = match event.channel() {
                            Some(channel) => state.hub.is_subscribed(conn_id, channel),
                            None => true,
                        };

                        if should_receive {
                            let sequence = conn.next_sequence();
                            let dispatch = GatewaySend {
                                op: OpCode::Dispatch as u8,
                                d: Some(event.to_json()),
                                s: Some(sequence),
                                t: Some(event.event_name().to_string()),
                            };
                            if tx.send(dispatch).is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            conn_id = %conn_id,
                            skipped = n,
                            "Event receiver lagged"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::error!("Device event channel closed");
                        break;
                    }
                }
            }
        }
    }

    // Cleanup
    state.hub.unregister(conn_id);
    sender_task.abort();

    tracing::info!(conn_id = %conn_id, "Gateway connection closed");
}

/// Handle one incoming gateway frame
fn handle_frame(
    text: &str,
    conn: &mut ConnectionState,
    tx: &mpsc::UnboundedSender<GatewaySend>,
    device: &Arc<VirtualDevice>,
    hub: &Arc<NotificationHub>,
) -> Result<(), String> {
    let frame: GatewayReceive =
        serde_json::from_str(text).map_err(|e| format!("Invalid JSON: {}", e))?;

    let Some(op) = OpCode::from_u8(frame.op) else {
        tracing::debug!(conn_id = %conn.conn_id, op = frame.op, "Unknown opcode");
        return Ok(());
    };

    match op {
        OpCode::Read => {
            let request: ChannelRequest = payload(frame.d)?;
            let Some(channel) = resolve_channel(&request.channel, tx) else {
                return Ok(());
            };

            let value = device.read(channel);
            send(tx, OpCode::ReadResult, ValuePayload { channel, value });
        }

        OpCode::Write => {
            let request: WriteRequest = payload(frame.d)?;
            let Some(channel) = resolve_channel(&request.channel, tx) else {
                return Ok(());
            };

            match device.write(channel, request.value.as_bytes()) {
                Ok(value) => send(tx, OpCode::WriteAck, ValuePayload { channel, value }),
                Err(error) => send_error(tx, &error),
            }
        }

        OpCode::Subscribe => {
            let request: ChannelRequest = payload(frame.d)?;
            let Some(channel) = resolve_channel(&request.channel, tx) else {
                return Ok(());
            };

            if !channel.is_notifiable() {
                send_error(
                    tx,
                    &AppError::InvalidInput(format!("channel {} does not notify", channel)),
                );
                return Ok(());
            }

            hub.subscribe(conn.conn_id, channel);
            send(
                tx,
                OpCode::Ack,
                AckPayload {
                    channel,
                    subscribed: true,
                },
            );

            // Seed the subscriber with the current value right away
            let value = device.read(channel);
            let seeded = GatewaySend {
                op: OpCode::Dispatch as u8,
                d: serde_json::to_value(ValueChangedEvent { channel, value }).ok(),
                s: Some(conn.next_sequence()),
                t: Some("VALUE_CHANGED".to_string()),
            };
            hub.send_to(conn.conn_id, seeded);
        }

        OpCode::Unsubscribe => {
            let request: ChannelRequest = payload(frame.d)?;
            let Some(channel) = resolve_channel(&request.channel, tx) else {
                return Ok(());
            };

            hub.unsubscribe(conn.conn_id, channel);
            send(
                tx,
                OpCode::Ack,
                AckPayload {
                    channel,
                    subscribed: false,
                },
            );
        }

        other => {
            tracing::debug!(
                conn_id = %conn.conn_id,
                op = other as u8,
                "Server-side opcode from client"
            );
        }
    }

    Ok(())
}

/// Decode the `d` field of a frame into a request payload
fn payload<T: DeserializeOwned>(d: Option<serde_json::Value>) -> Result<T, String> {
    let d = d.ok_or("Missing d field")?;
    serde_json::from_value(d).map_err(|e| format!("Invalid payload: {}", e))
}

/// Resolve a channel reference, replying with an error frame when unknown
fn resolve_channel(
    reference: &str,
    tx: &mpsc::UnboundedSender<GatewaySend>,
) -> Option<ChannelId> {
    match ChannelId::parse(reference) {
        Some(channel) => Some(channel),
        None => {
            send_error(tx, &AppError::UnknownChannel(reference.to_owned()));
            None
        }
    }
}

fn send<T: serde::Serialize>(tx: &mpsc::UnboundedSender<GatewaySend>, op: OpCode, body: T) {
    let _ = tx.send(GatewaySend {
        op: op as u8,
        d: serde_json::to_value(body).ok(),
        s: None,
        t: None,
    });
}

fn send_error(tx: &mpsc::UnboundedSender<GatewaySend>, error: &AppError) {
    send(
        tx,
        OpCode::Error,
        ErrorPayload {
            code: error.code(),
            message: error.to_string(),
        },
    );
}
