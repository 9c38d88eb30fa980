//! In-memory arena: balls, bricks, ghost clones, lasers, aim lines and HUD
//!
//! Implements every collaborator trait the paddle actions need, with just
//! enough physics to run a match headlessly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    ball_box_collision, ball_out_of_play, ball_wall_collision, paddle_rebound, reflect_velocity,
};
use super::geom::Aabb;
use super::paddle::Side;
use super::slots::SlotId;
use super::world::{
    ActionHud, BallControl, BallId, Contact, GhostId, IndicatorId, SlotView, SpatialQuery, Spawner,
};
use crate::consts::{BALL_RADIUS, PLAYFIELD_HALF_HEIGHT, PLAYFIELD_HALF_WIDTH};
use crate::sign;
use crate::tuning::Tuning;

/// Ticks a ball ignores paddles after a rebound or launch (prevents sticking)
const PADDLE_COOLDOWN_TICKS: u32 = 3;
/// How much of the paddle's velocity a rebound picks up
const INFLUENCE_FACTOR: f32 = 0.3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaBall {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Held by a magnet; ignores its own velocity
    pub frozen: bool,
    pub paddle_cooldown: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhostClone {
    pub id: GhostId,
    pub pos: Vec2,
    pub size: Vec2,
    pub dir_to_center: f32,
    /// Last steering input from the owning paddle
    pub input: Vec2,
    pub accepting_input: bool,
}

impl GhostClone {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserShot {
    pub pos: Vec2,
    pub dir: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AimLine {
    pub id: IndicatorId,
    pub start: Vec2,
    pub end: Vec2,
}

/// Running totals for the match summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaStats {
    pub bricks_destroyed: u32,
    pub balls_lost: u32,
    pub ghosts_popped: u32,
    pub lasers_fired: u32,
}

#[derive(Debug, Clone)]
pub struct Arena {
    bounds: Aabb,
    launch_speed: f32,
    ghost_drift_speed: f32,
    ghost_move_speed: f32,
    laser_speed: f32,
    pub bricks: Vec<Brick>,
    pub balls: Vec<ArenaBall>,
    pub ghosts: Vec<GhostClone>,
    pub lasers: Vec<LaserShot>,
    pub indicators: Vec<AimLine>,
    pub stats: ArenaStats,
    hud: [[SlotView; 2]; 2],
    next_id: u32,
}

impl Arena {
    /// Default-sized empty playfield centered on the origin
    pub fn standard(tuning: &Tuning) -> Self {
        let half = Vec2::new(PLAYFIELD_HALF_WIDTH, PLAYFIELD_HALF_HEIGHT);
        Self::new(Aabb::new(-half, half), tuning)
    }

    pub fn new(bounds: Aabb, tuning: &Tuning) -> Self {
        Self {
            bounds,
            launch_speed: tuning.ball_launch_speed,
            ghost_drift_speed: tuning.ghost_drift_speed,
            ghost_move_speed: tuning.ghost_move_speed,
            laser_speed: tuning.laser_speed,
            bricks: Vec::new(),
            balls: Vec::new(),
            ghosts: Vec::new(),
            lasers: Vec::new(),
            indicators: Vec::new(),
            stats: ArenaStats::default(),
            hud: [[SlotView::default(); 2]; 2],
            next_id: 1,
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn playfield_bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn spawn_ball(&mut self, pos: Vec2, vel: Vec2) -> BallId {
        let id = BallId(self.alloc_id());
        self.balls.push(ArenaBall {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
            frozen: false,
            paddle_cooldown: 0,
        });
        id
    }

    pub fn ball(&self, id: BallId) -> Option<&ArenaBall> {
        self.balls.iter().find(|b| b.id == id)
    }

    fn ball_mut(&mut self, id: BallId) -> Option<&mut ArenaBall> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    pub fn remove_ball(&mut self, id: BallId) {
        self.balls.retain(|b| b.id != id);
    }

    pub fn add_brick(&mut self, bounds: Aabb) -> u32 {
        let id = self.alloc_id();
        self.bricks.push(Brick { id, bounds });
        id
    }

    /// Grid of bricks filling the middle third of the field
    pub fn lay_brick_wall(&mut self, cols: u32, rows: u32) {
        if cols == 0 || rows == 0 {
            return;
        }
        let width = self.bounds.size().x / 3.0;
        let height = self.bounds.size().y * 0.8;
        let cell = Vec2::new(width / cols as f32, height / rows as f32);
        let origin = self.bounds.center() - Vec2::new(width, height) * 0.5;
        let gap = 0.05;

        for row in 0..rows {
            for col in 0..cols {
                let center = origin + cell * Vec2::new(col as f32 + 0.5, row as f32 + 0.5);
                self.add_brick(Aabb::from_center_size(center, cell - Vec2::splat(gap)));
            }
        }
        log::debug!("Laid {} bricks", cols * rows);
    }

    pub fn ghost(&self, id: GhostId) -> Option<&GhostClone> {
        self.ghosts.iter().find(|g| g.id == id)
    }

    pub fn remove_ghost(&mut self, id: GhostId) {
        self.ghosts.retain(|g| g.id != id);
    }

    pub fn indicator(&self, id: IndicatorId) -> Option<&AimLine> {
        self.indicators.iter().find(|line| line.id == id)
    }

    /// What the HUD currently shows for one slot
    pub fn hud(&self, side: Side, slot: SlotId) -> SlotView {
        self.hud[side.index()][slot.index()]
    }

    /// Free balls touching `paddle`
    pub fn ball_contacts(&self, paddle: &Aabb) -> Vec<Contact> {
        self.balls
            .iter()
            .filter(|b| !b.frozen && b.paddle_cooldown == 0)
            .filter_map(|b| {
                let hit = ball_box_collision(b.pos, b.radius, paddle);
                hit.hit.then(|| Contact::ball(b.id, hit.point))
            })
            .collect()
    }

    /// Normal rebound for a ball the paddle did not capture
    pub fn bounce_off_paddle(&mut self, id: BallId, paddle: &Aabb, dir_to_center: f32, influence: Vec2) {
        let Some(ball) = self.ball_mut(id) else {
            return;
        };
        if ball.frozen {
            return;
        }
        ball.vel = paddle_rebound(ball.vel, dir_to_center, influence, INFLUENCE_FACTOR);
        let face = paddle.center().x + dir_to_center * paddle.half_size().x;
        ball.pos.x = face + dir_to_center * ball.radius;
        ball.paddle_cooldown = PADDLE_COOLDOWN_TICKS;
    }

    /// Advance everything the arena owns by one fixed step
    pub fn step(&mut self, dt: f32) {
        self.step_balls(dt);
        self.step_ghosts(dt);
        self.step_lasers(dt);
    }

    fn step_balls(&mut self, dt: f32) {
        let field = self.bounds;
        let mut lost = Vec::new();

        for ball in self.balls.iter_mut().filter(|b| !b.frozen) {
            ball.paddle_cooldown = ball.paddle_cooldown.saturating_sub(1);
            ball.pos += ball.vel * dt;

            let wall = ball_wall_collision(ball.pos, ball.radius, &field);
            if wall.hit {
                ball.vel = reflect_velocity(ball.vel, wall.normal);
                ball.pos += wall.normal * wall.penetration;
            }

            if let Some(index) = self
                .bricks
                .iter()
                .position(|brick| ball_box_collision(ball.pos, ball.radius, &brick.bounds).hit)
            {
                let hit = ball_box_collision(ball.pos, ball.radius, &self.bricks[index].bounds);
                ball.vel = reflect_velocity(ball.vel, hit.normal);
                ball.pos += hit.normal * hit.penetration;
                self.bricks.swap_remove(index);
                self.stats.bricks_destroyed += 1;
            }

            if ball_out_of_play(ball.pos, ball.radius, &field) {
                lost.push(ball.id);
            }
        }

        for id in lost {
            log::info!("Ball {:?} left the field", id);
            self.remove_ball(id);
            self.stats.balls_lost += 1;
        }
    }

    fn step_ghosts(&mut self, dt: f32) {
        let field = self.bounds;
        let mut popped = Vec::new();

        for ghost in &mut self.ghosts {
            ghost.pos.x += ghost.dir_to_center * self.ghost_drift_speed * dt;
            if ghost.accepting_input {
                ghost.pos.y += ghost.input.y * self.ghost_move_speed * dt;
            }
            ghost.pos.y = field.clamp_box_center(ghost.pos, ghost.size).y;

            if !field.intersects(&ghost.bounds()) {
                popped.push(ghost.id);
                continue;
            }

            // A ghost survives exactly one ball, which it sends back
            let bounds = ghost.bounds();
            if let Some(ball) = self
                .balls
                .iter_mut()
                .find(|b| !b.frozen && ball_box_collision(b.pos, b.radius, &bounds).hit)
            {
                let hit = ball_box_collision(ball.pos, ball.radius, &bounds);
                ball.vel = reflect_velocity(ball.vel, hit.normal);
                ball.pos += hit.normal * hit.penetration;
                popped.push(ghost.id);
            }
        }

        for id in popped {
            log::debug!("Ghost {:?} gone", id);
            self.remove_ghost(id);
            self.stats.ghosts_popped += 1;
        }
    }

    fn step_lasers(&mut self, dt: f32) {
        let field = self.bounds;
        let speed = self.laser_speed;
        let bricks = &mut self.bricks;
        let stats = &mut self.stats;

        self.lasers.retain_mut(|shot| {
            shot.pos += shot.dir * speed * dt;
            if let Some(index) = bricks.iter().position(|b| b.bounds.contains_point(shot.pos)) {
                bricks.swap_remove(index);
                stats.bricks_destroyed += 1;
                return false;
            }
            field.contains_point(shot.pos)
        });
    }
}

impl SpatialQuery for Arena {
    fn playfield(&self) -> Aabb {
        self.bounds
    }

    fn raycast(&self, origin: Vec2, dir: Vec2, max_dist: f32) -> Option<f32> {
        self.bricks
            .iter()
            .filter_map(|brick| brick.bounds.ray_entry(origin, dir))
            .filter(|&t| t <= max_dist)
            .reduce(f32::min)
    }
}

impl BallControl for Arena {
    fn is_ball_alive(&self, ball: BallId) -> bool {
        self.ball(ball).is_some()
    }

    fn freeze_ball_on(&mut self, id: BallId, paddle: &Aabb) -> Vec2 {
        let center = paddle.center();
        let half = paddle.half_size();
        // Field is centered on the origin, so the face toward it is the inner one
        let dir = if center.x == 0.0 { 1.0 } else { sign(-center.x) };
        let Some(ball) = self.ball_mut(id) else {
            return center;
        };

        ball.pos = Vec2::new(
            center.x + dir * (half.x + ball.radius),
            ball.pos.y.clamp(paddle.min.y, paddle.max.y),
        );
        ball.vel = Vec2::ZERO;
        ball.frozen = true;
        ball.pos
    }

    fn move_ball_to(&mut self, id: BallId, pos: Vec2) {
        if let Some(ball) = self.ball_mut(id) {
            ball.pos = pos;
        }
    }

    fn launch_ball(&mut self, id: BallId, dir: Vec2) {
        let speed = self.launch_speed;
        if let Some(ball) = self.ball_mut(id) {
            ball.frozen = false;
            ball.vel = dir.normalize_or_zero() * speed;
            ball.paddle_cooldown = PADDLE_COOLDOWN_TICKS;
        }
    }
}

impl Spawner for Arena {
    fn spawn_ghost(&mut self, pos: Vec2, size: Vec2, dir_to_center: f32) -> GhostId {
        let id = GhostId(self.alloc_id());
        self.ghosts.push(GhostClone {
            id,
            pos,
            size,
            dir_to_center,
            input: Vec2::ZERO,
            accepting_input: true,
        });
        id
    }

    fn is_ghost_alive(&self, ghost: GhostId) -> bool {
        self.ghost(ghost).is_some()
    }

    fn steer_ghost(&mut self, ghost: GhostId, input: Vec2) {
        if let Some(clone) = self.ghosts.iter_mut().find(|g| g.id == ghost) {
            if clone.accepting_input {
                clone.input = input;
            }
        }
    }

    fn release_ghost(&mut self, ghost: GhostId) {
        if let Some(clone) = self.ghosts.iter_mut().find(|g| g.id == ghost) {
            clone.accepting_input = false;
            clone.input = Vec2::ZERO;
        }
    }

    fn spawn_laser(&mut self, origin: Vec2, dir: Vec2) {
        self.lasers.push(LaserShot {
            pos: origin,
            dir: dir.normalize_or_zero(),
        });
        self.stats.lasers_fired += 1;
    }

    fn spawn_indicator(&mut self, start: Vec2, end: Vec2) -> IndicatorId {
        let id = IndicatorId(self.alloc_id());
        self.indicators.push(AimLine { id, start, end });
        id
    }

    fn update_indicator(&mut self, indicator: IndicatorId, start: Vec2, end: Vec2) {
        if let Some(line) = self.indicators.iter_mut().find(|line| line.id == indicator) {
            line.start = start;
            line.end = end;
        }
    }

    fn despawn_indicator(&mut self, indicator: IndicatorId) {
        self.indicators.retain(|line| line.id != indicator);
    }
}

impl ActionHud for Arena {
    fn show_slot(&mut self, side: Side, slot: SlotId, view: SlotView) {
        self.hud[side.index()][slot.index()] = view;
    }
}
