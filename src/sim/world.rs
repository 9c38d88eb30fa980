//! Collaborator interfaces the paddle core talks to
//!
//! Everything outside the action framework (ball physics, projectiles, ghost
//! clones, HUD widgets, the physics backend) is reached through these traits.
//! The core never holds a reference into collaborator storage; it only keeps
//! ids and asks again every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::Glyph;
use super::geom::Aabb;
use super::paddle::Side;
use super::slots::SlotId;

/// Handle to a ball owned by the ball collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Handle to a spawned ghost paddle clone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GhostId(pub u32);

/// Handle to a laser aim indicator line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorId(pub u32);

/// Something touched the paddle this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The ball involved, if the other body was a ball
    pub ball: Option<BallId>,
    /// Contact point in world space
    pub point: Vec2,
}

impl Contact {
    pub fn ball(id: BallId, point: Vec2) -> Self {
        Self {
            ball: Some(id),
            point,
        }
    }
}

/// Physics-backend queries, kept minimal so any backend can provide them
pub trait SpatialQuery {
    /// Playfield bounds
    fn playfield(&self) -> Aabb;

    /// Whether the box lies completely within the playfield
    fn is_box_inside(&self, bounds: &Aabb) -> bool {
        self.playfield().contains_box(bounds)
    }

    /// Distance along `dir` to the first obstruction within `max_dist`
    fn raycast(&self, origin: Vec2, dir: Vec2, max_dist: f32) -> Option<f32>;
}

/// Ball collaborator operations consumed by Magnetize
pub trait BallControl {
    fn is_ball_alive(&self, ball: BallId) -> bool;

    /// Freeze the ball against the paddle edge; returns where it was placed
    fn freeze_ball_on(&mut self, ball: BallId, paddle: &Aabb) -> Vec2;

    /// Teleport a frozen ball
    fn move_ball_to(&mut self, ball: BallId, pos: Vec2);

    /// Unfreeze and send the ball along `dir`
    fn launch_ball(&mut self, ball: BallId, dir: Vec2);
}

/// Entities the actions create and steer
pub trait Spawner {
    /// Spawn a ghost clone; it drifts along `dir_to_center` on its own
    fn spawn_ghost(&mut self, pos: Vec2, size: Vec2, dir_to_center: f32) -> GhostId;
    fn is_ghost_alive(&self, ghost: GhostId) -> bool;
    /// Vertical movement input for a ghost still accepting control
    fn steer_ghost(&mut self, ghost: GhostId, input: Vec2);
    /// Ghost stops accepting input and keeps drifting passively
    fn release_ghost(&mut self, ghost: GhostId);

    fn spawn_laser(&mut self, origin: Vec2, dir: Vec2);

    fn spawn_indicator(&mut self, start: Vec2, end: Vec2) -> IndicatorId;
    fn update_indicator(&mut self, indicator: IndicatorId, start: Vec2, end: Vec2);
    fn despawn_indicator(&mut self, indicator: IndicatorId);
}

/// What one slot icon should show
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub glyph: Glyph,
    pub pressed: bool,
    /// Remaining presses/duration as a 0-1 fraction (None = unlimited)
    pub remaining: Option<f32>,
}

impl Default for SlotView {
    fn default() -> Self {
        Self {
            glyph: Glyph::Empty,
            pressed: false,
            remaining: None,
        }
    }
}

/// Write-only HUD sink (two icons and two progress rings per paddle)
pub trait ActionHud {
    fn show_slot(&mut self, side: Side, slot: SlotId, view: SlotView);
}

/// Everything an action hook may touch outside its own paddle
pub trait World: SpatialQuery + BallControl + Spawner + ActionHud {}

impl<T: SpatialQuery + BallControl + Spawner + ActionHud> World for T {}
