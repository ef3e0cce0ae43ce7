//! Battery Model
//!
//! Simulated battery for the virtual module. The level only ever drains;
//! when it would hit zero it wraps back to full so the simulation never
//! goes dark.

/// Battery level in percent, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Battery {
    level: u8,
}

impl Battery {
    pub const FULL: u8 = 100;

    /// Create a battery at `initial` percent, clamped into `1..=100`.
    pub fn new(initial: u8) -> Self {
        Self {
            level: initial.clamp(1, Self::FULL),
        }
    }

    pub fn level(self) -> u8 {
        self.level
    }

    /// Drop the level by one percent, wrapping to full below one.
    /// Returns the new level.
    pub fn drain(&mut self) -> u8 {
        self.level = if self.level <= 1 {
            Self::FULL
        } else {
            self.level - 1
        };
        self.level
    }
}
