//! Channel Handlers
//!
//! Request handlers for the attribute channel surface. A channel can be
//! addressed by its name or by its attribute UUID; values travel as the
//! same textual payloads the gateway carries.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::domain::channel::{ChannelId, ChannelSpec, CHANNELS};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Channel value response
#[derive(Debug, Serialize)]
pub struct ChannelValueResponse {
    pub channel: ChannelId,
    pub value: String,
}

/// GET /api/v1/channels
pub async fn list_channels() -> Json<Vec<ChannelSpec>> {
    Json(CHANNELS.to_vec())
}

/// GET /api/v1/channels/{channel}
pub async fn read_channel(
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> Result<Json<ChannelValueResponse>, AppError> {
    let channel = resolve(&channel)?;
    let value = state.device.read(channel);

    Ok(Json(ChannelValueResponse { channel, value }))
}

/// PUT /api/v1/channels/{channel}
///
/// The raw request body is the write payload.
pub async fn write_channel(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    body: Bytes,
) -> Result<Json<ChannelValueResponse>, AppError> {
    let channel = resolve(&channel)?;
    let value = state.device.write(channel, &body)?;

    Ok(Json(ChannelValueResponse { channel, value }))
}

fn resolve(reference: &str) -> Result<ChannelId, AppError> {
    ChannelId::parse(reference).ok_or_else(|| AppError::UnknownChannel(reference.to_owned()))
}
