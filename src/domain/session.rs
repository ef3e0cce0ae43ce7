//! Session State
//!
//! Pure state for the therapy session machine. Protocol rules (when a
//! session starts, completes, or resets) live in the application layer;
//! this type only records the facts and offers mechanical transitions.

use std::fmt;
use std::time::Instant;

/// The two phases of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Active,
}

impl SessionStatus {
    /// Wire value reported on the status channel.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Idle => "Inactive",
            SessionStatus::Active => "Active",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable session state.
///
/// All access goes through the controller's lock; nothing else holds a
/// reference to this.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Commanded intensity in percent. Zero means "not set".
    pub intensity: u32,
    /// Commanded duration in seconds. Zero means "not set".
    pub target_secs: u64,
    /// Seconds elapsed since the session started, as of the last
    /// reconciliation.
    pub elapsed_secs: u64,
    /// Reference point elapsed time is measured from.
    pub started_at: Instant,
    /// Whether a session is currently running.
    pub active: bool,
    /// Free-form operator identity, untouched by session transitions.
    pub user_id: String,
    /// Free-form wall-clock stamp, untouched by session transitions.
    pub timestamp: String,
}

impl SessionState {
    pub fn new(now: Instant) -> Self {
        Self {
            intensity: 0,
            target_secs: 0,
            elapsed_secs: 0,
            started_at: now,
            active: false,
            user_id: String::new(),
            timestamp: String::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.active {
            SessionStatus::Active
        } else {
            SessionStatus::Idle
        }
    }

    /// Begin (or restart) a session: the elapsed counter restarts from
    /// this moment.
    pub fn begin(&mut self, now: Instant) {
        self.active = true;
        self.elapsed_secs = 0;
        self.started_at = now;
    }

    /// Leave or stay in the idle phase with a fresh reference point.
    pub fn deactivate(&mut self, now: Instant) {
        self.active = false;
        self.elapsed_secs = 0;
        self.started_at = now;
    }

    /// Finish a running session: thresholds and progress are zeroed,
    /// metadata survives. Returns the target the session ran against.
    pub fn complete(&mut self, now: Instant) -> u64 {
        let target = self.target_secs;
        self.intensity = 0;
        self.target_secs = 0;
        self.deactivate(now);
        target
    }
}
