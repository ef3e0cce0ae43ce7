//! Therapy Session Controller
//!
//! Enforces the session protocol over one shared state: a session starts
//! when both thresholds become positive, runs while the clock advances,
//! and resets itself on completion. Write handlers, reads of the elapsed
//! channel, and the periodic tick all funnel through the same lock, so
//! transitions and their notifications happen in one order.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::application::clock::Clock;
use crate::domain::channel::ChannelId;
use crate::domain::session::{SessionState, SessionStatus};
use crate::infrastructure::display::{DisplayPort, StatusView};
use crate::infrastructure::metrics;
use crate::presentation::websocket::gateway::NotificationHub;
use crate::shared::encoding;
use crate::shared::error::AppError;

/// Byte cap on the user id channel, matching the physical module's buffer.
pub const MAX_USER_ID_BYTES: usize = 50;

/// Byte cap on the timestamp channel, matching the physical module's buffer.
pub const MAX_TIMESTAMP_BYTES: usize = 20;

/// Point-in-time view of the session, as reported over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub intensity: u32,
    pub target_secs: u64,
    pub elapsed_secs: u64,
    pub status: String,
    pub user_id: String,
    pub timestamp: String,
}

/// The two threshold channels that gate a session.
#[derive(Debug, Clone, Copy)]
enum Threshold {
    Intensity,
    TargetDuration,
}

impl Threshold {
    fn channel(self) -> ChannelId {
        match self {
            Threshold::Intensity => ChannelId::Intensity,
            Threshold::TargetDuration => ChannelId::TargetDuration,
        }
    }
}

/// Session protocol over one mutex-guarded state.
pub struct TherapyController {
    state: Mutex<SessionState>,
    clock: Arc<dyn Clock>,
    hub: Arc<NotificationHub>,
    display: Arc<dyn DisplayPort>,
}

impl TherapyController {
    pub fn new(
        clock: Arc<dyn Clock>,
        hub: Arc<NotificationHub>,
        display: Arc<dyn DisplayPort>,
    ) -> Self {
        let state = SessionState::new(clock.now());
        Self {
            state: Mutex::new(state),
            clock,
            hub,
            display,
        }
    }

    /// Apply a write to the intensity channel. Returns the stored value.
    pub fn set_intensity(&self, payload: &[u8]) -> Result<u32, AppError> {
        let value = encoding::decode_uint(payload)?;
        let value = u32::try_from(value)
            .map_err(|_| AppError::InvalidInput("intensity out of range".into()))?;

        self.apply_threshold(Threshold::Intensity, u64::from(value));
        Ok(value)
    }

    /// Apply a write to the target duration channel. Returns the stored value.
    pub fn set_target_duration(&self, payload: &[u8]) -> Result<u64, AppError> {
        let value = encoding::decode_uint(payload)?;

        self.apply_threshold(Threshold::TargetDuration, value);
        Ok(value)
    }

    /// Shared write path for the two threshold channels.
    ///
    /// With a positive counterpart, a positive write (re)starts the
    /// session and a zero write merely parks the threshold; with a zero
    /// counterpart the session drops to idle with a fresh reference
    /// point.
    fn apply_threshold(&self, which: Threshold, value: u64) {
        let mut state = self.state.lock();
        let prior = state.status();

        match which {
            Threshold::Intensity => state.intensity = value as u32,
            Threshold::TargetDuration => state.target_secs = value,
        }

        let counterpart = match which {
            Threshold::Intensity => state.target_secs,
            Threshold::TargetDuration => u64::from(state.intensity),
        };

        let mut started = false;
        if counterpart > 0 {
            if value > 0 {
                state.begin(self.clock.now());
                started = true;
            }
        } else {
            state.deactivate(self.clock.now());
        }

        self.hub.publish(which.channel(), value.to_string());
        let status = state.status();
        if status != prior {
            self.hub
                .publish(ChannelId::Status, status.as_str().to_owned());
        }
        if started {
            self.hub.session_started(state.intensity, state.target_secs);
            metrics::record_session_started();
            tracing::info!(
                intensity = state.intensity,
                target_secs = state.target_secs,
                "therapy session started"
            );
        }

        self.display.update_status(&Self::view(&state));
    }

    /// Apply a write to the user id channel.
    pub fn set_user_id(&self, payload: &[u8]) -> Result<(), AppError> {
        let value = encoding::decode_text(payload, MAX_USER_ID_BYTES)?;

        let mut state = self.state.lock();
        state.user_id = value;
        self.display.update_status(&Self::view(&state));
        Ok(())
    }

    /// Apply a write to the timestamp channel.
    pub fn set_timestamp(&self, payload: &[u8]) -> Result<(), AppError> {
        let value = encoding::decode_text(payload, MAX_TIMESTAMP_BYTES)?;

        let mut state = self.state.lock();
        state.timestamp = value;
        self.display.update_status(&Self::view(&state));
        Ok(())
    }

    /// Read the elapsed channel.
    ///
    /// While a session runs this reconciles the stored count with the
    /// clock. While idle it re-arms the reference point and reports
    /// zero, so a stale instant can never leak into the next session.
    pub fn elapsed_secs(&self) -> u64 {
        let mut state = self.state.lock();
        let now = self.clock.now();

        if state.active {
            state.elapsed_secs = round_secs(now.duration_since(state.started_at));
        } else {
            state.started_at = now;
            state.elapsed_secs = 0;
        }

        state.elapsed_secs
    }

    /// Periodic reconciliation, driven once per second.
    ///
    /// Advances the elapsed count, reports progress while a target is
    /// set, and finishes the session once the target is reached.
    pub fn tick(&self) {
        let mut state = self.state.lock();
        let now = self.clock.now();

        if !state.active {
            state.started_at = now;
            state.elapsed_secs = 0;
            return;
        }

        state.elapsed_secs = round_secs(now.duration_since(state.started_at));

        if state.target_secs > 0 {
            let shown = state.elapsed_secs.min(state.target_secs);
            self.display.update_progress(shown, state.target_secs);
            self.hub
                .publish(ChannelId::ElapsedSeconds, state.elapsed_secs.to_string());
        }

        if state.elapsed_secs >= state.target_secs {
            let target = state.complete(now);
            self.hub.publish(ChannelId::Intensity, "0".to_owned());
            self.hub.publish(ChannelId::TargetDuration, "0".to_owned());
            self.hub.publish(ChannelId::ElapsedSeconds, "0".to_owned());
            self.hub
                .publish(ChannelId::Status, SessionStatus::Idle.as_str().to_owned());
            self.hub.session_completed(target);
            metrics::record_session_completed();
            self.display.session_completed(target);
            tracing::info!(target_secs = target, "therapy session completed");
        }

        self.display.update_status(&Self::view(&state));
    }

    pub fn status(&self) -> SessionStatus {
        self.state.lock().status()
    }

    pub fn intensity(&self) -> u32 {
        self.state.lock().intensity
    }

    pub fn target_secs(&self) -> u64 {
        self.state.lock().target_secs
    }

    pub fn user_id(&self) -> String {
        self.state.lock().user_id.clone()
    }

    pub fn timestamp(&self) -> String {
        self.state.lock().timestamp.clone()
    }

    /// Current session view for the HTTP surface.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            intensity: state.intensity,
            target_secs: state.target_secs,
            elapsed_secs: state.elapsed_secs,
            status: state.status().as_str().to_owned(),
            user_id: state.user_id.clone(),
            timestamp: state.timestamp.clone(),
        }
    }

    fn view(state: &SessionState) -> StatusView {
        StatusView {
            intensity: state.intensity,
            target_secs: state.target_secs,
            user_id: state.user_id.clone(),
            timestamp: state.timestamp.clone(),
            active: state.active,
        }
    }
}

fn round_secs(elapsed: Duration) -> u64 {
    elapsed.as_secs_f64().round() as u64
}
