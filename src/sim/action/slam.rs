//! Slam: a scripted dash toward the center followed by a slow return
//!
//! `Idle -> Slamming -> Resetting -> Idle`. While the paddle is off its
//! starting x the action refuses to be unbound.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{ActionCtx, ActionHooks};
use crate::sim::world::World;
use crate::tuning::SlamTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlamPhase {
    #[default]
    Idle,
    Slamming,
    Resetting,
}

#[derive(Debug, Clone)]
pub struct Slam {
    phase: SlamPhase,
    /// Paddle position when the slam started
    origin: Vec2,
    tuning: SlamTuning,
}

impl Slam {
    pub fn new(tuning: SlamTuning) -> Self {
        Self {
            phase: SlamPhase::Idle,
            origin: Vec2::ZERO,
            tuning,
        }
    }

    pub fn phase(&self) -> SlamPhase {
        self.phase
    }

    fn tick_slamming(&mut self, ctx: &mut ActionCtx<'_>) {
        let t = &self.tuning;
        let dir = ctx.body.dir_to_center;
        let travelled = (ctx.body.pos.x - self.origin.x) * dir;
        let progress = travelled / t.distance;

        let accel = if progress < t.switch_progress {
            t.acceleration
        } else {
            -t.deceleration
        };
        // Never stall before the end, or the slam would never finish
        let speed = (ctx.body.vel.x * dir + accel * ctx.dt).max(t.min_speed);

        if travelled + speed * ctx.dt >= t.distance {
            ctx.body.vel.x = 0.0;
            ctx.body.pos.x = self.origin.x + t.distance * dir;
            self.phase = SlamPhase::Resetting;
            log::debug!("Slam reached full extent, returning");
        } else {
            ctx.body.vel.x = speed * dir;
        }
    }

    fn tick_resetting(&mut self, ctx: &mut ActionCtx<'_>) {
        let dir = ctx.body.dir_to_center;
        let travelled = (ctx.body.pos.x - self.origin.x) * dir;

        if travelled - self.tuning.return_speed * ctx.dt <= 0.0 {
            ctx.body.vel.x = 0.0;
            ctx.body.pos.x = self.origin.x;
            self.phase = SlamPhase::Idle;
            log::debug!("Slam back home");
        } else {
            ctx.body.vel.x = -self.tuning.return_speed * dir;
        }
    }
}

impl ActionHooks for Slam {
    fn on_press(&mut self, ctx: &mut ActionCtx<'_>) -> bool {
        if self.phase != SlamPhase::Idle {
            return false;
        }

        self.origin = ctx.body.pos;
        self.phase = SlamPhase::Slamming;
        ctx.body.vel.x += self.tuning.initial_speed * ctx.body.dir_to_center;
        true
    }

    fn on_physics_tick(&mut self, ctx: &mut ActionCtx<'_>) {
        match self.phase {
            SlamPhase::Idle => {}
            SlamPhase::Slamming => self.tick_slamming(ctx),
            SlamPhase::Resetting => self.tick_resetting(ctx),
        }
    }

    fn can_release(&self, _world: &dyn World) -> bool {
        self.phase == SlamPhase::Idle
    }

    fn reset(&mut self) {
        self.phase = SlamPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::arena::Arena;
    use crate::sim::paddle::{PaddleBody, Side};
    use crate::tuning::Tuning;

    /// Hook then integrate, the same order the paddle uses
    fn step(slam: &mut Slam, body: &mut PaddleBody, arena: &mut Arena) {
        let mut ctx = ActionCtx::new(body, arena, SIM_DT, None);
        slam.on_physics_tick(&mut ctx);
        body.pos += body.vel * SIM_DT;
    }

    #[test]
    fn test_press_only_from_idle() {
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Right);
        let mut slam = Slam::new(SlamTuning::default());
        let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);

        assert!(slam.on_press(&mut ctx));
        assert_eq!(slam.phase(), SlamPhase::Slamming);
        assert!(!slam.can_release(&*ctx.world));
        assert!(!slam.on_press(&mut ctx));
        // Right paddle kicks toward -x
        assert!(ctx.body.vel.x < 0.0);
    }

    #[test]
    fn test_full_cycle_returns_to_origin() {
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Left);
        let home_x = body.pos.x;
        let mut slam = Slam::new(SlamTuning::default());
        {
            let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);
            slam.on_press(&mut ctx);
        }

        let mut saw_resetting = false;
        for _ in 0..1000 {
            step(&mut slam, &mut body, &mut arena);
            saw_resetting |= slam.phase() == SlamPhase::Resetting;
            if slam.phase() == SlamPhase::Idle {
                break;
            }
        }
        assert!(saw_resetting);
        assert_eq!(slam.phase(), SlamPhase::Idle);
        assert!((body.pos.x - home_x).abs() < 1e-5);
        assert_eq!(body.vel.x, 0.0);
        assert!(slam.can_release(&arena));
    }

    #[test]
    fn test_snaps_to_exact_extent() {
        let tuning = SlamTuning::default();
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Left);
        let home_x = body.pos.x;
        let mut slam = Slam::new(tuning.clone());
        {
            let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);
            slam.on_press(&mut ctx);
        }

        while slam.phase() == SlamPhase::Slamming {
            step(&mut slam, &mut body, &mut arena);
        }
        assert!((body.pos.x - (home_x + tuning.distance)).abs() < 1e-5);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut slam = Slam::new(SlamTuning::default());
        slam.phase = SlamPhase::Resetting;
        slam.reset();
        assert_eq!(slam.phase(), SlamPhase::Idle);
    }
}
