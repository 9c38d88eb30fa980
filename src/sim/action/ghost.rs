//! Ghost paddle: spawn a detached clone and steer it while the button is held

use glam::Vec2;

use super::{ActionCtx, ActionHooks};
use crate::sim::paddle::{InputAuthority, PaddleBody};
use crate::sim::world::{GhostId, World};

#[derive(Debug, Clone, Default)]
pub struct GhostPaddle {
    ghost: Option<GhostId>,
    controlling: bool,
}

impl GhostPaddle {
    pub fn ghost(&self) -> Option<GhostId> {
        self.ghost
    }

    pub fn is_controlling(&self) -> bool {
        self.controlling
    }

    fn reclaim(&mut self, body: &mut PaddleBody) {
        if self.controlling {
            log::debug!("Paddle regains movement input");
        }
        body.authority = InputAuthority::Paddle;
        self.controlling = false;
    }

    fn ghost_alive(&self, ctx: &ActionCtx<'_>) -> bool {
        self.ghost.is_some_and(|id| ctx.world.is_ghost_alive(id))
    }
}

impl ActionHooks for GhostPaddle {
    fn on_press(&mut self, ctx: &mut ActionCtx<'_>) -> bool {
        let id = ctx
            .world
            .spawn_ghost(ctx.body.pos, ctx.body.size, ctx.body.dir_to_center);

        // An older clone keeps drifting on its own
        if let Some(old) = self.ghost.replace(id) {
            if ctx.world.is_ghost_alive(old) {
                ctx.world.release_ghost(old);
            }
        }

        ctx.body.authority = InputAuthority::Ghost;
        self.controlling = true;
        log::debug!("Ghost {:?} spawned, movement input handed over", id);
        true
    }

    fn on_held(&mut self, ctx: &mut ActionCtx<'_>) {
        if self.controlling && !self.ghost_alive(ctx) {
            self.reclaim(ctx.body);
        }
    }

    fn on_release(&mut self, ctx: &mut ActionCtx<'_>) {
        self.reclaim(ctx.body);
    }

    fn on_physics_tick(&mut self, ctx: &mut ActionCtx<'_>) {
        let Some(id) = self.ghost else {
            return;
        };

        if !ctx.world.is_ghost_alive(id) {
            // Clone died between input frames
            if self.controlling {
                self.reclaim(ctx.body);
            }
            return;
        }

        let input = if self.controlling {
            ctx.body.move_input
        } else {
            Vec2::ZERO
        };
        ctx.world.steer_ghost(id, input);
    }

    fn on_unassign(&mut self, ctx: &mut ActionCtx<'_>) {
        if let Some(id) = self.ghost.take() {
            if ctx.world.is_ghost_alive(id) {
                ctx.world.release_ghost(id);
            }
        }
        self.reclaim(ctx.body);
    }

    /// Blocks only while steering a clone that is still alive
    fn can_release(&self, world: &dyn World) -> bool {
        !self.controlling || !self.ghost.is_some_and(|id| world.is_ghost_alive(id))
    }

    fn reset(&mut self) {
        self.ghost = None;
        self.controlling = false;
    }
}
