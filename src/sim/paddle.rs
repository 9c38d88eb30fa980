//! Paddle controller
//!
//! A paddle owns its movement body, two action slots and one long-lived
//! instance of every action kind. Collaborators only ever talk to the paddle;
//! instances are never handed out mutably.
//!
//! Physics step order:
//! 1. resolve kinematics (input velocity, playfield clamp)
//! 2. `on_physics_tick` for both bound actions (may change velocity)
//! 3. `after_physics_tick` for both, which place things at the projected
//!    next-tick position
//! 4. duration countdown, unassign attempt at zero
//! 5. release sweep for deferred or forced removals
//! 6. HUD refresh
//! 7. integrate position

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{
    ActionCatalog, ActionCtx, ActionHooks, ActionInstance, ActionKind, ActionPool, ReleaseState,
    SlamPhase,
};
use super::geom::Aabb;
use super::slots::{Slot, SlotBank, SlotId};
use super::world::{Contact, SlotView, World};
use crate::consts::{
    BALL_RADIUS, BALL_SPAWN_NUDGE, PADDLE_HEIGHT, PADDLE_HOME_X, PADDLE_WIDTH, SIM_DT,
};
use crate::{only_x, only_y};

/// Which screen edge a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// +1 when the center of the field lies toward +x
    pub fn dir_to_center(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn home_x(self) -> f32 {
        -self.dir_to_center() * PADDLE_HOME_X
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Who consumes the paddle's vertical movement input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputAuthority {
    #[default]
    Paddle,
    /// Handed to a ghost clone; the paddle itself holds still
    Ghost,
}

/// Kinematic state of a paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleBody {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Latest movement input, -1..1 per axis
    pub move_input: Vec2,
    pub authority: InputAuthority,
    pub dir_to_center: f32,
    home_pos: Vec2,
    home_size: Vec2,
}

impl PaddleBody {
    pub fn new(side: Side) -> Self {
        let home_pos = Vec2::new(side.home_x(), 0.0);
        let home_size = Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT);
        Self {
            pos: home_pos,
            vel: Vec2::ZERO,
            size: home_size,
            move_input: Vec2::ZERO,
            authority: InputAuthority::Paddle,
            dir_to_center: side.dir_to_center(),
            home_pos,
            home_size,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// Where the paddle will be after integrating `dt` at its current velocity
    #[inline]
    pub fn projected_pos(&self, dt: f32) -> Vec2 {
        self.pos + self.vel * dt
    }

    pub fn projected_bounds(&self, dt: f32) -> Aabb {
        self.bounds().translated(self.vel * dt)
    }

    pub fn home_pos(&self) -> Vec2 {
        self.home_pos
    }

    pub fn home_size(&self) -> Vec2 {
        self.home_size
    }

    pub fn set_height(&mut self, height: f32) {
        self.size.y = height;
    }

    pub fn reset_size(&mut self) {
        self.size = self.home_size;
    }

    pub fn reset_to_home(&mut self) {
        self.pos = self.home_pos;
        self.vel = Vec2::ZERO;
        self.size = self.home_size;
        self.move_input = Vec2::ZERO;
        self.authority = InputAuthority::Paddle;
    }
}

#[derive(Debug, Clone)]
pub struct Paddle {
    side: Side,
    body: PaddleBody,
    move_speed: f32,
    slots: SlotBank,
    pool: ActionPool,
}

impl Paddle {
    pub fn new(side: Side, catalog: &ActionCatalog) -> Self {
        Self {
            side,
            body: PaddleBody::new(side),
            move_speed: catalog.tuning().paddle_move_speed,
            slots: SlotBank::new(),
            pool: ActionPool::new(catalog),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn body(&self) -> &PaddleBody {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut PaddleBody {
        &mut self.body
    }

    pub fn slot(&self, slot: SlotId) -> Slot {
        self.slots.get(slot)
    }

    pub fn slot_of(&self, kind: ActionKind) -> Option<SlotId> {
        self.slots.slot_of(kind)
    }

    pub fn next_slot(&self) -> SlotId {
        self.slots.next_target()
    }

    /// Read-only view of one pooled instance, bound or not
    pub fn action(&self, kind: ActionKind) -> &ActionInstance {
        self.pool.get(kind)
    }

    pub fn set_move_input(&mut self, input: Vec2) {
        self.body.move_input = input.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Run one hook of `kind` with a fresh context. A release request raised
    /// by the hook marks the instance for forced removal.
    fn run_hook<R>(
        &mut self,
        kind: ActionKind,
        world: &mut dyn World,
        dt: f32,
        hook: impl FnOnce(&mut dyn ActionHooks, &mut ActionCtx<'_>) -> R,
    ) -> R {
        let partner = self.slots.partner_of(kind);
        let mut ctx = ActionCtx::new(&mut self.body, world, dt, partner);
        let instance = self.pool.get_mut(kind);
        let out = hook(instance.hooks_mut(), &mut ctx);
        if ctx.release_requested() {
            instance.mark_released();
        }
        out
    }

    /// Finish a forced removal requested during an input-frame hook
    fn settle(&mut self, kind: ActionKind, world: &mut dyn World) {
        if self.pool.get(kind).release_state() == ReleaseState::Released {
            self.try_unassign(kind, true, world);
        }
    }

    // ------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------

    /// Entry point for power-up pickups
    pub fn assign_action_from_powerup(&mut self, kind: ActionKind, world: &mut dyn World) -> bool {
        log::info!("{} paddle picked up {}", self.side.as_str(), kind.as_str());
        self.assign_next(kind, world)
    }

    /// Bind `kind` into the round-robin target slot, or refresh it if it is
    /// already bound. False when the current occupant refused to leave; the
    /// pointer does not move in that case.
    pub fn assign_next(&mut self, kind: ActionKind, world: &mut dyn World) -> bool {
        if let Some(slot) = self.slots.slot_of(kind) {
            self.pool.get_mut(kind).restore();
            self.run_hook(kind, world, SIM_DT, |hooks, ctx| hooks.on_restore(ctx));
            log::info!(
                "{} paddle refreshed {} in slot {:?}",
                self.side.as_str(),
                kind.as_str(),
                slot
            );
            self.refresh_hud(slot, world);
            return true;
        }

        let target = self.slots.next_target();
        if let Some(occupant) = self.slots.get(target).kind() {
            if !self.try_unassign(occupant, false, world) {
                log::warn!(
                    "{} paddle: {} refused to leave slot {:?}, {} not assigned",
                    self.side.as_str(),
                    occupant.as_str(),
                    target,
                    kind.as_str()
                );
                return false;
            }
        }

        self.slots.bind(target, kind);
        self.pool.get_mut(kind).restore();
        self.run_hook(kind, world, SIM_DT, |hooks, ctx| hooks.on_assign(ctx));
        self.slots.advance();
        log::info!(
            "{} paddle bound {} to slot {:?}",
            self.side.as_str(),
            kind.as_str(),
            target
        );
        self.refresh_hud(target, world);
        true
    }

    /// Non-forced unassign. True if `kind` is no longer bound afterwards.
    pub fn unassign(&mut self, kind: ActionKind, world: &mut dyn World) -> bool {
        self.try_unassign(kind, false, world)
    }

    fn try_unassign(&mut self, kind: ActionKind, force: bool, world: &mut dyn World) -> bool {
        let Some(slot) = self.slots.slot_of(kind) else {
            return true;
        };

        let instance = self.pool.get_mut(kind);
        if !force && !instance.release_allowed(world) {
            instance.mark_pending();
            log::debug!(
                "{} paddle: unassign of {} deferred",
                self.side.as_str(),
                kind.as_str()
            );
            return false;
        }

        // The hook still sees the live sub-state; the reset comes after
        self.run_hook(kind, world, SIM_DT, |hooks, ctx| hooks.on_unassign(ctx));
        self.pool.get_mut(kind).reset();
        self.slots.clear(slot);
        log::info!(
            "{} paddle unbound {} from slot {:?}",
            self.side.as_str(),
            kind.as_str(),
            slot
        );
        self.refresh_hud(slot, world);
        true
    }

    // ------------------------------------------------------------------
    // Input frame dispatch
    // ------------------------------------------------------------------

    /// Rising edge on `slot`'s trigger. True if the bound action accepted it.
    pub fn press(&mut self, slot: SlotId, world: &mut dyn World) -> bool {
        let Some(kind) = self.slots.get(slot).kind() else {
            self.refresh_hud(slot, world);
            return false;
        };
        if self.pool.get(kind).press_exhausted() {
            return false;
        }

        self.pool.get_mut(kind).set_held(true);
        let accepted = self.run_hook(kind, world, SIM_DT, |hooks, ctx| hooks.on_press(ctx));
        if accepted && self.pool.get_mut(kind).consume_press() {
            self.try_unassign(kind, false, world);
        }
        self.settle(kind, world);
        self.refresh_hud(slot, world);
        accepted
    }

    /// Trigger still down on a later frame
    pub fn hold(&mut self, slot: SlotId, world: &mut dyn World) {
        let Some(kind) = self.slots.get(slot).kind() else {
            return;
        };
        if !self.pool.get(kind).is_held() {
            return;
        }
        self.run_hook(kind, world, SIM_DT, |hooks, ctx| hooks.on_held(ctx));
        self.settle(kind, world);
    }

    /// Falling edge. Ignored unless the bound action saw the press.
    pub fn release(&mut self, slot: SlotId, world: &mut dyn World) {
        let Some(kind) = self.slots.get(slot).kind() else {
            return;
        };
        if !self.pool.get(kind).is_held() {
            return;
        }
        self.pool.get_mut(kind).set_held(false);
        self.run_hook(kind, world, SIM_DT, |hooks, ctx| hooks.on_release(ctx));
        self.settle(kind, world);
        self.refresh_hud(slot, world);
    }

    // ------------------------------------------------------------------
    // Physics
    // ------------------------------------------------------------------

    fn resolve_movement(&mut self, world: &dyn World, dt: f32) {
        let body = &mut self.body;
        body.vel.y = match body.authority {
            InputAuthority::Paddle => body.move_input.y * self.move_speed,
            InputAuthority::Ghost => 0.0,
        };

        let next = body.projected_bounds(dt);
        if !world.is_box_inside(&next) {
            body.vel = Vec2::ZERO;
            body.pos = world.playfield().clamp_box_center(next.center(), body.size);
        }
    }

    /// One fixed physics step
    pub fn physics_tick(&mut self, world: &mut dyn World, dt: f32) {
        self.resolve_movement(world, dt);

        for slot in SlotId::BOTH {
            if let Some(kind) = self.slots.get(slot).kind() {
                self.run_hook(kind, world, dt, |hooks, ctx| hooks.on_physics_tick(ctx));
            }
        }
        // Velocity is final now; projected positions hold for both slots
        for slot in SlotId::BOTH {
            if let Some(kind) = self.slots.get(slot).kind() {
                self.run_hook(kind, world, dt, |hooks, ctx| hooks.after_physics_tick(ctx));
            }
        }

        for slot in SlotId::BOTH {
            let Some(kind) = self.slots.get(slot).kind() else {
                continue;
            };
            if self.pool.get_mut(kind).drain_duration(dt) {
                log::debug!("{} ran out of time", kind.as_str());
                self.try_unassign(kind, false, world);
            }
        }

        for slot in SlotId::BOTH {
            if let Some(kind) = self.slots.get(slot).kind() {
                if self.pool.get(kind).release_due(world) {
                    self.try_unassign(kind, true, world);
                }
            }
        }

        for slot in SlotId::BOTH {
            self.refresh_hud(slot, world);
        }

        self.body.pos += self.body.vel * dt;
    }

    /// Something touched the paddle; both bound actions hear about it
    pub fn on_contact(&mut self, contact: &Contact, world: &mut dyn World) {
        for slot in SlotId::BOTH {
            let Some(kind) = self.slots.get(slot).kind() else {
                continue;
            };
            self.run_hook(kind, world, SIM_DT, |hooks, ctx| hooks.on_collision(ctx, contact));
            self.settle(kind, world);
        }
    }

    // ------------------------------------------------------------------
    // Misc
    // ------------------------------------------------------------------

    /// Drop both actions unconditionally and return to the home pose
    pub fn reset(&mut self, world: &mut dyn World) {
        for slot in SlotId::BOTH {
            if let Some(kind) = self.slots.get(slot).kind() {
                self.try_unassign(kind, true, world);
            }
        }
        self.body.reset_to_home();
        self.slots.reset_pointer();
        for slot in SlotId::BOTH {
            self.refresh_hud(slot, world);
        }
    }

    /// Where a freshly served ball should appear
    pub fn ball_spawn_pos(&self) -> Vec2 {
        let reach = self.body.size.x * 0.5 + BALL_RADIUS + BALL_SPAWN_NUDGE;
        self.body.pos + only_x(self.body.dir_to_center * reach)
    }

    /// Velocity the paddle imparts on a ball it hits. Horizontal motion only
    /// counts while a slam is driving it.
    pub fn influence_velocity(&self) -> Vec2 {
        let slamming = self.slots.slot_of(ActionKind::Slam).is_some()
            && self
                .pool
                .get(ActionKind::Slam)
                .as_slam()
                .is_some_and(|slam| slam.phase() == SlamPhase::Slamming);

        if slamming {
            self.body.vel
        } else {
            only_y(self.body.vel.y)
        }
    }

    fn refresh_hud(&self, slot: SlotId, world: &mut dyn World) {
        let view = match self.slots.get(slot).kind() {
            Some(kind) => self.pool.get(kind).view(),
            None => SlotView::default(),
        };
        world.show_slot(self.side, slot, view);
    }
}
