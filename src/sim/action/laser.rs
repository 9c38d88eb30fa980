//! Laser fire: two aim lines while bound, two shots per press

use glam::Vec2;

use super::{ActionCtx, ActionHooks};
use crate::only_x;
use crate::sim::paddle::PaddleBody;
use crate::sim::world::{IndicatorId, World};

#[derive(Debug, Clone, Default)]
pub struct LaserFire {
    indicators: Option<[IndicatorId; 2]>,
}

impl LaserFire {
    pub fn indicators(&self) -> Option<[IndicatorId; 2]> {
        self.indicators
    }

    /// Top and bottom corners of the paddle's center-facing side, `lead` seconds ahead
    fn muzzles(body: &PaddleBody, lead: f32) -> [Vec2; 2] {
        let center = body.projected_pos(lead);
        let front_x = center.x + body.dir_to_center * body.size.x * 0.5;
        let half_h = body.size.y * 0.5;
        [
            Vec2::new(front_x, center.y + half_h),
            Vec2::new(front_x, center.y - half_h),
        ]
    }

    /// Where an aim line starting at `start` stops: first obstruction or playfield edge
    fn aim_end(world: &dyn World, start: Vec2, dir: Vec2) -> Vec2 {
        let max_dist = world.playfield().ray_exit(start, dir);
        let dist = world
            .raycast(start, dir, max_dist)
            .map_or(max_dist, |d| d.min(max_dist));
        start + dir * dist
    }
}

impl ActionHooks for LaserFire {
    fn on_assign(&mut self, ctx: &mut ActionCtx<'_>) {
        let dir = only_x(ctx.body.dir_to_center);
        let ids = Self::muzzles(ctx.body, 0.0).map(|start| {
            let end = Self::aim_end(&*ctx.world, start, dir);
            ctx.world.spawn_indicator(start, end)
        });
        self.indicators = Some(ids);
    }

    fn after_physics_tick(&mut self, ctx: &mut ActionCtx<'_>) {
        let Some(ids) = self.indicators else {
            return;
        };
        let dir = only_x(ctx.body.dir_to_center);
        let starts = Self::muzzles(ctx.body, ctx.dt);
        for (id, start) in ids.into_iter().zip(starts) {
            let end = Self::aim_end(&*ctx.world, start, dir);
            ctx.world.update_indicator(id, start, end);
        }
    }

    fn on_press(&mut self, ctx: &mut ActionCtx<'_>) -> bool {
        let dir = only_x(ctx.body.dir_to_center);
        for origin in Self::muzzles(ctx.body, 0.0) {
            ctx.world.spawn_laser(origin, dir);
        }
        true
    }

    fn on_unassign(&mut self, ctx: &mut ActionCtx<'_>) {
        if let Some(ids) = self.indicators.take() {
            for id in ids {
                ctx.world.despawn_indicator(id);
            }
        }
    }

    fn reset(&mut self) {
        self.indicators = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::arena::Arena;
    use crate::sim::geom::Aabb;
    use crate::sim::paddle::Side;
    use crate::tuning::Tuning;

    #[test]
    fn test_aim_lines_stop_at_first_brick() {
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Left);
        let top_y = body.pos.y + body.size.y * 0.5;
        arena.add_brick(Aabb::from_center_size(Vec2::new(0.0, top_y), Vec2::new(1.0, 0.2)));

        let mut laser = LaserFire::default();
        {
            let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);
            laser.on_assign(&mut ctx);
        }
        let [top, bottom] = laser.indicators().unwrap();
        let top_line = arena.indicator(top).unwrap();
        let bottom_line = arena.indicator(bottom).unwrap();
        assert!((top_line.end.x - (-0.5)).abs() < 1e-4);
        // Nothing in the way: runs to the far edge
        assert!((bottom_line.end.x - arena.playfield_bounds().max.x).abs() < 1e-4);
    }

    #[test]
    fn test_aim_lines_follow_projected_edges() {
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Right);
        body.vel = Vec2::new(0.0, 5.0);
        let mut laser = LaserFire::default();
        {
            let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);
            laser.on_assign(&mut ctx);
            laser.after_physics_tick(&mut ctx);
        }
        let [top, _] = laser.indicators().unwrap();
        let expected_y = body.pos.y + 5.0 * SIM_DT + body.size.y * 0.5;
        assert!((arena.indicator(top).unwrap().start.y - expected_y).abs() < 1e-5);
    }

    #[test]
    fn test_press_fires_two_shots_and_unassign_clears_lines() {
        let mut arena = Arena::standard(&Tuning::default());
        let mut body = PaddleBody::new(Side::Right);
        let mut laser = LaserFire::default();
        {
            let mut ctx = ActionCtx::new(&mut body, &mut arena, SIM_DT, None);
            laser.on_assign(&mut ctx);
            assert!(laser.on_press(&mut ctx));
            laser.on_unassign(&mut ctx);
        }
        assert_eq!(arena.lasers.len(), 2);
        assert!(arena.lasers.iter().all(|shot| shot.dir.x < 0.0));
        assert!(arena.indicators.is_empty());
        assert!(laser.indicators().is_none());
    }
}
