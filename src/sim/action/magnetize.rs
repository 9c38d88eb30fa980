//! Magnetize: catch balls on contact, carry them, fire them on press
//!
//! Holding the button turns the magnet off so balls pass through normally.
//! Captured balls are positioned against the paddle's projected next-tick
//! position so they stay glued through the upcoming integration step.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{ActionCtx, ActionHooks};
use crate::only_x;
use crate::sim::world::{BallId, Contact};

#[derive(Debug, Clone)]
pub struct Magnetize {
    magnetized: bool,
    /// Serve-time variant: removes itself after the first successful launch
    one_shot: bool,
    /// Captured ball -> offset from paddle center (ordered for determinism)
    captured: BTreeMap<BallId, Vec2>,
}

impl Magnetize {
    pub fn new(one_shot: bool) -> Self {
        Self {
            magnetized: true,
            one_shot,
            captured: BTreeMap::new(),
        }
    }

    pub fn is_magnetized(&self) -> bool {
        self.magnetized
    }

    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }

    pub fn offset_of(&self, ball: BallId) -> Option<Vec2> {
        self.captured.get(&ball).copied()
    }

    /// Launch every live captured ball toward the center; returns how many went
    fn launch_all(&mut self, ctx: &mut ActionCtx<'_>) -> usize {
        let dir = only_x(ctx.body.dir_to_center);
        let mut launched = 0;
        for ball in std::mem::take(&mut self.captured).into_keys() {
            if ctx.world.is_ball_alive(ball) {
                ctx.world.launch_ball(ball, dir);
                launched += 1;
            }
        }
        launched
    }
}

impl ActionHooks for Magnetize {
    fn on_press(&mut self, ctx: &mut ActionCtx<'_>) -> bool {
        // A one-shot magnet with nothing on it keeps its single use
        if self.one_shot && self.captured.is_empty() {
            return false;
        }

        let launched = self.launch_all(ctx);
        log::debug!("Magnet launched {} ball(s)", launched);

        if self.one_shot {
            ctx.request_release();
        }
        true
    }

    fn on_held(&mut self, _ctx: &mut ActionCtx<'_>) {
        self.magnetized = false;
    }

    fn on_release(&mut self, _ctx: &mut ActionCtx<'_>) {
        self.magnetized = true;
    }

    fn after_physics_tick(&mut self, ctx: &mut ActionCtx<'_>) {
        self.captured.retain(|ball, _| ctx.world.is_ball_alive(*ball));

        let next_paddle_pos = ctx.body.projected_pos(ctx.dt);
        for (&ball, &offset) in &self.captured {
            ctx.world.move_ball_to(ball, next_paddle_pos + offset);
        }
    }

    fn on_collision(&mut self, ctx: &mut ActionCtx<'_>, contact: &Contact) {
        if !self.magnetized {
            return;
        }
        let Some(ball) = contact.ball else {
            return;
        };
        if self.captured.contains_key(&ball) {
            return;
        }

        let ball_pos = ctx.world.freeze_ball_on(ball, &ctx.body.bounds());
        self.captured.insert(ball, ball_pos - ctx.body.pos);
    }

    fn on_unassign(&mut self, ctx: &mut ActionCtx<'_>) {
        if !self.captured.is_empty() {
            let launched = self.launch_all(ctx);
            log::debug!("Magnet dropped, fired {} held ball(s)", launched);
        }
    }

    fn reset(&mut self) {
        self.magnetized = true;
        self.captured.clear();
    }
}
