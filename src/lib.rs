//! Duo Breakout - two paddles, one playfield, a lot of bricks
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddles, action slots, arena collaborators)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield extents (world units, centered on origin)
    pub const PLAYFIELD_HALF_WIDTH: f32 = 9.0;
    pub const PLAYFIELD_HALF_HEIGHT: f32 = 5.0;

    /// Paddle defaults - each paddle sits near its own vertical edge
    pub const PADDLE_HOME_X: f32 = 8.0;
    pub const PADDLE_WIDTH: f32 = 0.25;
    pub const PADDLE_HEIGHT: f32 = 1.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.15;
    pub const BALL_LAUNCH_SPEED: f32 = 8.0;
    /// How far in front of the paddle a fresh ball is placed
    pub const BALL_SPAWN_NUDGE: f32 = 0.13;
}

/// Sign of a value, or 0 for exactly zero
#[inline]
pub fn sign(val: f32) -> f32 {
    if val < 0.0 {
        -1.0
    } else if val > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Vector with only an x component
#[inline]
pub fn only_x(x: f32) -> Vec2 {
    Vec2::new(x, 0.0)
}

/// Vector with only a y component
#[inline]
pub fn only_y(y: f32) -> Vec2 {
    Vec2::new(0.0, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(0.5), 1.0);
    }

    #[test]
    fn test_axis_vectors() {
        assert_eq!(only_x(2.0), Vec2::new(2.0, 0.0));
        assert_eq!(only_y(-1.0), Vec2::new(0.0, -1.0));
    }
}
