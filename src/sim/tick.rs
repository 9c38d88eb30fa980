//! Input frames and fixed timestep simulation ticks
//!
//! Button edges are applied once per input frame; physics advances in fixed
//! steps. The two run at independent rates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::paddle::Side;
use super::slots::SlotId;
use super::state::MatchState;

/// What a trigger did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ButtonEdge {
    #[default]
    Idle,
    /// Went down this frame
    Pressed,
    /// Still down
    Held,
    /// Came up this frame
    Released,
}

impl ButtonEdge {
    pub fn from_levels(was_down: bool, is_down: bool) -> Self {
        match (was_down, is_down) {
            (false, true) => ButtonEdge::Pressed,
            (true, true) => ButtonEdge::Held,
            (true, false) => ButtonEdge::Released,
            (false, false) => ButtonEdge::Idle,
        }
    }
}

/// One paddle's input for a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaddleInput {
    /// Movement stick, -1..1 per axis (only y moves the paddle)
    pub movement: Vec2,
    /// Trigger edges for slot A and slot B
    pub actions: [ButtonEdge; 2],
}

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: PaddleInput,
    pub right: PaddleInput,
}

impl TickInput {
    pub fn get(&self, side: Side) -> &PaddleInput {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Apply one input frame: movement vectors and trigger edges
pub fn frame(state: &mut MatchState, input: &TickInput) {
    for side in Side::BOTH {
        let paddle_input = *input.get(side);
        let (paddle, arena) = state.split_mut(side);
        paddle.set_move_input(paddle_input.movement);

        for slot in SlotId::BOTH {
            match paddle_input.actions[slot.index()] {
                ButtonEdge::Idle => {}
                ButtonEdge::Pressed => {
                    paddle.press(slot, arena);
                }
                ButtonEdge::Held => paddle.hold(slot, arena),
                ButtonEdge::Released => paddle.release(slot, arena),
            }
        }
    }
    state.frames += 1;
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut MatchState, dt: f32) {
    for side in Side::BOTH {
        let (paddle, arena) = state.split_mut(side);
        paddle.physics_tick(arena, dt);
    }

    state.arena.step(dt);

    // Contacts after the step: actions get first claim, the rest rebound
    for side in Side::BOTH {
        let (paddle, arena) = state.split_mut(side);
        let bounds = paddle.body().bounds();
        for contact in arena.ball_contacts(&bounds) {
            paddle.on_contact(&contact, arena);

            let Some(id) = contact.ball else {
                continue;
            };
            let still_free = arena.ball(id).is_some_and(|ball| !ball.frozen);
            if still_free {
                arena.bounce_off_paddle(
                    id,
                    &bounds,
                    paddle.body().dir_to_center,
                    paddle.influence_velocity(),
                );
            }
        }
    }

    if state.arena.balls.is_empty() {
        state.serve();
    }

    state.time_ticks += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::action::ActionKind;
    use crate::sim::state::PickupKind;
    use crate::tuning::Tuning;

    fn press(side: Side, slot: SlotId) -> TickInput {
        let mut input = TickInput::default();
        let paddle = match side {
            Side::Left => &mut input.left,
            Side::Right => &mut input.right,
        };
        paddle.actions[slot.index()] = ButtonEdge::Pressed;
        input
    }

    #[test]
    fn test_edges_from_levels() {
        assert_eq!(ButtonEdge::from_levels(false, true), ButtonEdge::Pressed);
        assert_eq!(ButtonEdge::from_levels(true, true), ButtonEdge::Held);
        assert_eq!(ButtonEdge::from_levels(true, false), ButtonEdge::Released);
        assert_eq!(ButtonEdge::from_levels(false, false), ButtonEdge::Idle);
    }

    #[test]
    fn test_serve_launch_frees_slot() {
        let mut state = MatchState::new(&Tuning::default(), 1);
        tick(&mut state, SIM_DT);
        assert!(state.arena.balls[0].frozen);

        frame(&mut state, &press(Side::Left, SlotId::A));
        let left = state.paddle(Side::Left);
        assert!(left.slot(SlotId::A).is_empty());
        assert!(!state.arena.balls[0].frozen);
        assert!(state.arena.balls[0].vel.x > 0.0);

        tick(&mut state, SIM_DT);
        assert_eq!(state.time_ticks, 2);
        assert_eq!(state.frames, 1);
    }

    #[test]
    fn test_free_ball_rebounds_off_paddle() {
        let mut state = MatchState::new(&Tuning::default(), 1);
        let (right, arena) = state.split_mut(Side::Right);
        let start = right.body().pos + Vec2::new(-0.5, 0.0);
        let id = arena.spawn_ball(start, Vec2::new(10.0, 0.0));

        for _ in 0..10 {
            tick(&mut state, SIM_DT);
        }
        let ball = state.arena.ball(id).unwrap();
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_magnet_catches_incoming_ball() {
        let mut state = MatchState::new(&Tuning::default(), 1);
        assert!(state.pickup(Side::Right, PickupKind::Magnetize));
        let (right, arena) = state.split_mut(Side::Right);
        let start = right.body().pos + Vec2::new(-0.5, 0.0);
        let id = arena.spawn_ball(start, Vec2::new(10.0, 0.0));

        for _ in 0..10 {
            tick(&mut state, SIM_DT);
        }
        assert!(state.arena.ball(id).unwrap().frozen);
        let magnet = state
            .paddle(Side::Right)
            .action(ActionKind::Magnetize)
            .as_magnetize()
            .unwrap();
        assert_eq!(magnet.captured_count(), 1);
    }

    #[test]
    fn test_lost_balls_trigger_new_serve() {
        let mut state = MatchState::new(&Tuning::default(), 1);
        frame(&mut state, &press(Side::Left, SlotId::A));
        let ids: Vec<_> = state.arena.balls.iter().map(|b| b.id).collect();
        for id in ids {
            state.arena.remove_ball(id);
        }

        tick(&mut state, SIM_DT);
        assert_eq!(state.arena.balls.len(), 1);
        assert_eq!(
            state.paddle(Side::Right).slot_of(ActionKind::MagnetizeOnce),
            Some(SlotId::A)
        );
    }

    #[test]
    fn test_determinism() {
        // Two matches with the same seed and input stream stay identical
        let tuning = Tuning::default();
        let mut a = MatchState::new(&tuning, 99);
        let mut b = MatchState::new(&tuning, 99);

        let mut inputs = vec![press(Side::Left, SlotId::A); 1];
        inputs.push(TickInput {
            left: PaddleInput {
                movement: Vec2::new(0.0, 1.0),
                ..Default::default()
            },
            right: PaddleInput {
                movement: Vec2::new(0.0, -1.0),
                ..Default::default()
            },
        });

        for state in [&mut a, &mut b] {
            state.pickup(Side::Right, PickupKind::MultiBall);
            for input in &inputs {
                frame(state, input);
                for _ in 0..30 {
                    tick(state, SIM_DT);
                }
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.arena.balls.len(), b.arena.balls.len());
        for (x, y) in a.arena.balls.iter().zip(&b.arena.balls) {
            assert_eq!(x.pos, y.pos);
        }
        assert_eq!(a.paddle(Side::Left).body().pos, b.paddle(Side::Left).body().pos);
    }
}
