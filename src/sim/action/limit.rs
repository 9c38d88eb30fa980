//! Resource governor: press budgets and duration countdowns
//!
//! Both counters only move down during play and are refilled wholesale on
//! restore. Hitting the floor is reported to the caller, which decides what
//! to do about it (the paddle attempts an unassign).

use serde::{Deserialize, Serialize};

/// Finite number of successful presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressLimit {
    remaining: u32,
    max: u32,
}

impl PressLimit {
    /// Negative raw values mean unlimited
    pub fn from_raw(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(|max| Self {
            remaining: max,
            max,
        })
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Spend one press. Returns true when this spend hit the floor.
    pub fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn restore(&mut self) {
        self.remaining = self.max;
    }

    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.remaining as f32 / self.max as f32
        }
    }
}

/// Countdown in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationLimit {
    remaining: f32,
    max: f32,
}

impl DurationLimit {
    /// Negative raw values mean unlimited
    pub fn from_raw(raw: f32) -> Option<Self> {
        (raw >= 0.0).then_some(Self {
            remaining: raw,
            max: raw,
        })
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Count down by `dt`, clamped at zero. Returns true when this drain hit the floor.
    pub fn drain(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        self.remaining == 0.0
    }

    pub fn restore(&mut self) {
        self.remaining = self.max;
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.remaining / self.max
        }
    }
}
