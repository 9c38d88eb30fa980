//! Match state: two paddles facing each other across one arena

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::action::{ActionCatalog, ActionKind};
use super::arena::Arena;
use super::paddle::{Paddle, Side};
use super::world::{BallControl, Contact};
use crate::tuning::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Magnetize,
    Slam,
    GhostPaddle,
    GrowPaddle,
    ShrinkPaddle,
    LaserFire,
    /// Not an action: two extra balls from the paddle
    MultiBall,
}

impl PickupKind {
    pub const ALL: [PickupKind; 7] = [
        PickupKind::Magnetize,
        PickupKind::Slam,
        PickupKind::GhostPaddle,
        PickupKind::GrowPaddle,
        PickupKind::ShrinkPaddle,
        PickupKind::LaserFire,
        PickupKind::MultiBall,
    ];

    /// Action bound by this pickup, if any
    pub fn action(self) -> Option<ActionKind> {
        match self {
            PickupKind::Magnetize => Some(ActionKind::Magnetize),
            PickupKind::Slam => Some(ActionKind::Slam),
            PickupKind::GhostPaddle => Some(ActionKind::GhostPaddle),
            PickupKind::GrowPaddle => Some(ActionKind::GrowPaddle),
            PickupKind::ShrinkPaddle => Some(ActionKind::ShrinkPaddle),
            PickupKind::LaserFire => Some(ActionKind::LaserFire),
            PickupKind::MultiBall => None,
        }
    }
}

/// Complete match state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Input frames processed
    pub frames: u64,
    pub arena: Arena,
    /// Side that receives the next serve
    pub serve_side: Side,
    catalog: ActionCatalog,
    paddles: [Paddle; 2],
    rng: Pcg32,
}

impl MatchState {
    /// New match with a brick wall and the ball served to the left paddle
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        let catalog = ActionCatalog::new(tuning);
        let mut arena = Arena::standard(tuning);
        arena.lay_brick_wall(4, 8);

        let mut state = Self {
            seed,
            time_ticks: 0,
            frames: 0,
            paddles: Side::BOTH.map(|side| Paddle::new(side, &catalog)),
            catalog,
            arena,
            serve_side: Side::Left,
            rng: Pcg32::seed_from_u64(seed),
        };

        state.serve();
        state
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    /// One paddle and the arena it acts on, borrowed together
    pub fn split_mut(&mut self, side: Side) -> (&mut Paddle, &mut Arena) {
        (&mut self.paddles[side.index()], &mut self.arena)
    }

    /// Put a ball on the serving paddle, held by a one-shot magnet. If the
    /// magnet cannot be bound right now the ball is launched straight away.
    pub fn serve(&mut self) {
        let side = self.serve_side;
        self.serve_side = match side {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        };

        let (paddle, arena) = self.split_mut(side);
        let ball = arena.spawn_ball(paddle.ball_spawn_pos(), Vec2::ZERO);

        if paddle.assign_next(ActionKind::MagnetizeOnce, arena) {
            let contact = Contact::ball(ball, paddle.ball_spawn_pos());
            paddle.on_contact(&contact, arena);
            log::info!("Ball served to {} paddle", side.as_str());
        } else {
            arena.launch_ball(ball, Vec2::new(paddle.body().dir_to_center, 0.0));
            log::warn!("{} paddle could not hold the serve, launched directly", side.as_str());
        }
    }

    /// A paddle collected a power-up
    pub fn pickup(&mut self, side: Side, kind: PickupKind) -> bool {
        match kind.action() {
            Some(action) => {
                let (paddle, arena) = self.split_mut(side);
                paddle.assign_action_from_powerup(action, arena)
            }
            None => {
                self.spawn_multiball(side);
                true
            }
        }
    }

    fn spawn_multiball(&mut self, side: Side) {
        let paddle = &self.paddles[side.index()];
        let origin = paddle.ball_spawn_pos();
        let dir_x = paddle.body().dir_to_center;
        let speed = self.catalog.tuning().ball_launch_speed;

        for _ in 0..2 {
            let spread = self.rng.random_range(-0.6..0.6_f32);
            let vel = Vec2::new(dir_x, spread).normalize() * speed;
            self.arena.spawn_ball(origin, vel);
        }
        log::info!("Multi-ball for {} paddle", side.as_str());
    }

    /// Random pickup, for demos and soak tests
    pub fn random_pickup(&mut self) -> PickupKind {
        let index = self.rng.random_range(0..PickupKind::ALL.len());
        PickupKind::ALL[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::slots::SlotId;

    #[test]
    fn test_new_match_serves_left() {
        let state = MatchState::new(&Tuning::default(), 7);
        let left = state.paddle(Side::Left);
        assert_eq!(left.slot_of(ActionKind::MagnetizeOnce), Some(SlotId::A));
        assert_eq!(state.serve_side, Side::Right);
        assert_eq!(state.arena.balls.len(), 1);
        assert!(state.arena.balls[0].frozen);
        let magnet = left.action(ActionKind::MagnetizeOnce).as_magnetize().unwrap();
        assert_eq!(magnet.captured_count(), 1);
    }

    #[test]
    fn test_pickup_binds_action() {
        let mut state = MatchState::new(&Tuning::default(), 7);
        assert!(state.pickup(Side::Right, PickupKind::Slam));
        assert_eq!(state.paddle(Side::Right).slot_of(ActionKind::Slam), Some(SlotId::A));
    }

    #[test]
    fn test_multiball_spawns_toward_center() {
        let mut state = MatchState::new(&Tuning::default(), 7);
        assert!(state.pickup(Side::Right, PickupKind::MultiBall));
        assert_eq!(state.arena.balls.len(), 3);
        assert!(state.arena.balls[1..].iter().all(|b| b.vel.x < 0.0));
    }

    #[test]
    fn test_same_seed_same_pickups() {
        let mut a = MatchState::new(&Tuning::default(), 42);
        let mut b = MatchState::new(&Tuning::default(), 42);
        for _ in 0..20 {
            assert_eq!(a.random_pickup(), b.random_pickup());
        }
    }
}
