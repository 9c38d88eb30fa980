//! Paddle actions: the hook contract, per-kind state machines and the
//! long-lived instance pool each paddle owns.
//!
//! Every kind implements [`ActionHooks`]; unimplemented hooks fall back to
//! no-ops. An [`ActionInstance`] wraps one kind's payload together with the
//! shared bookkeeping (held flag, press/duration budgets, release state).

pub mod ghost;
pub mod laser;
pub mod limit;
pub mod magnetize;
pub mod resize;
pub mod slam;

pub use ghost::GhostPaddle;
pub use laser::LaserFire;
pub use limit::{DurationLimit, PressLimit};
pub use magnetize::Magnetize;
pub use resize::{Resize, ResizeMode};
pub use slam::{Slam, SlamPhase};

use serde::{Deserialize, Serialize};

use super::paddle::PaddleBody;
use super::world::{Contact, SlotView, World};
use crate::tuning::{ActionLimits, Tuning};

/// Every action a paddle can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Magnetize,
    /// Single-use magnet handed out at serve time
    MagnetizeOnce,
    Slam,
    GhostPaddle,
    GrowPaddle,
    ShrinkPaddle,
    LaserFire,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Magnetize,
        ActionKind::MagnetizeOnce,
        ActionKind::Slam,
        ActionKind::GhostPaddle,
        ActionKind::GrowPaddle,
        ActionKind::ShrinkPaddle,
        ActionKind::LaserFire,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Magnetize => "Magnetize",
            ActionKind::MagnetizeOnce => "MagnetizeOnce",
            ActionKind::Slam => "Slam",
            ActionKind::GhostPaddle => "GhostPaddle",
            ActionKind::GrowPaddle => "GrowPaddle",
            ActionKind::ShrinkPaddle => "ShrinkPaddle",
            ActionKind::LaserFire => "LaserFire",
        }
    }
}

/// Icon shown in a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Empty,
    Magnet,
    MagnetOff,
    Slam,
    Ghost,
    Grow,
    Shrink,
    Laser,
}

/// Static description of one action kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub kind: ActionKind,
    pub unpressed: Glyph,
    pub pressed: Glyph,
    /// Negative = unlimited
    pub press_limit: i32,
    /// Seconds, negative = unlimited
    pub duration_limit: f32,
}

impl ActionDefinition {
    /// Build from tuning. A missing unpressed glyph is a configuration defect:
    /// it is reported and the pressed glyph is shared instead.
    pub fn from_limits(kind: ActionKind, limits: &ActionLimits) -> Self {
        let unpressed = match (limits.unpressed_glyph, limits.pressed_glyph) {
            (Some(glyph), _) => glyph,
            (None, fallback) => {
                log::error!(
                    "{} has no unpressed glyph, falling back to {:?}",
                    kind.as_str(),
                    fallback.unwrap_or(Glyph::Empty)
                );
                fallback.unwrap_or(Glyph::Empty)
            }
        };

        Self {
            kind,
            unpressed,
            pressed: limits.pressed_glyph.unwrap_or(unpressed),
            press_limit: limits.press_limit,
            duration_limit: limits.duration_limit,
        }
    }

    pub fn glyph(&self, held: bool) -> Glyph {
        if held { self.pressed } else { self.unpressed }
    }
}

/// Tri-state replacing the old delayed/forced unassignment flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReleaseState {
    /// Normal bound operation
    #[default]
    Bound,
    /// An unassign was refused; the sweep retries once the action allows it
    PendingRelease,
    /// Removal may no longer be refused
    Released,
}

/// What a hook gets to work with
pub struct ActionCtx<'a> {
    pub body: &'a mut PaddleBody,
    pub world: &'a mut dyn World,
    /// Fixed physics step length
    pub dt: f32,
    /// Kind bound in the other slot of the same paddle
    pub partner: Option<ActionKind>,
    release_requested: bool,
}

impl<'a> ActionCtx<'a> {
    pub fn new(
        body: &'a mut PaddleBody,
        world: &'a mut dyn World,
        dt: f32,
        partner: Option<ActionKind>,
    ) -> Self {
        Self {
            body,
            world,
            dt,
            partner,
            release_requested: false,
        }
    }

    /// Ask to be unassigned right after this hook, without the usual veto
    pub fn request_release(&mut self) {
        self.release_requested = true;
    }

    pub fn release_requested(&self) -> bool {
        self.release_requested
    }
}

/// Lifecycle hooks. All default to no-ops.
pub trait ActionHooks {
    /// Rising edge. Only a `true` result spends a press.
    fn on_press(&mut self, _ctx: &mut ActionCtx<'_>) -> bool {
        true
    }

    /// Every input frame after the press while the trigger stays down
    fn on_held(&mut self, _ctx: &mut ActionCtx<'_>) {}

    /// Falling edge
    fn on_release(&mut self, _ctx: &mut ActionCtx<'_>) {}

    fn on_physics_tick(&mut self, _ctx: &mut ActionCtx<'_>) {}

    /// After every bound action's `on_physics_tick`, once this step's
    /// velocity is final. Anything placed at the projected position goes here.
    fn after_physics_tick(&mut self, _ctx: &mut ActionCtx<'_>) {}

    fn on_collision(&mut self, _ctx: &mut ActionCtx<'_>, _contact: &Contact) {}

    fn on_assign(&mut self, _ctx: &mut ActionCtx<'_>) {}

    fn on_unassign(&mut self, _ctx: &mut ActionCtx<'_>) {}

    /// Re-acquired while already bound
    fn on_restore(&mut self, _ctx: &mut ActionCtx<'_>) {}

    /// False while tearing down now would leave the paddle mid-invariant.
    /// Collaborator state is passed in so liveness is never stale.
    fn can_release(&self, _world: &dyn World) -> bool {
        true
    }

    /// Back to the initial sub-state
    fn reset(&mut self) {}
}

/// Kind-specific runtime state
#[derive(Debug, Clone)]
pub enum ActionPayload {
    Magnetize(Magnetize),
    Slam(Slam),
    GhostPaddle(GhostPaddle),
    Resize(Resize),
    LaserFire(LaserFire),
}

impl ActionPayload {
    pub fn hooks(&self) -> &dyn ActionHooks {
        match self {
            ActionPayload::Magnetize(a) => a,
            ActionPayload::Slam(a) => a,
            ActionPayload::GhostPaddle(a) => a,
            ActionPayload::Resize(a) => a,
            ActionPayload::LaserFire(a) => a,
        }
    }

    pub fn hooks_mut(&mut self) -> &mut dyn ActionHooks {
        match self {
            ActionPayload::Magnetize(a) => a,
            ActionPayload::Slam(a) => a,
            ActionPayload::GhostPaddle(a) => a,
            ActionPayload::Resize(a) => a,
            ActionPayload::LaserFire(a) => a,
        }
    }
}

/// One long-lived action object owned by a paddle
#[derive(Debug, Clone)]
pub struct ActionInstance {
    definition: ActionDefinition,
    held: bool,
    presses: Option<PressLimit>,
    duration: Option<DurationLimit>,
    release: ReleaseState,
    payload: ActionPayload,
}

impl ActionInstance {
    pub fn new(definition: ActionDefinition, payload: ActionPayload) -> Self {
        Self {
            presses: PressLimit::from_raw(definition.press_limit),
            duration: DurationLimit::from_raw(definition.duration_limit),
            definition,
            held: false,
            release: ReleaseState::Bound,
            payload,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.definition.kind
    }

    pub fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub(crate) fn set_held(&mut self, held: bool) {
        self.held = held;
    }

    pub fn release_state(&self) -> ReleaseState {
        self.release
    }

    pub fn presses(&self) -> Option<&PressLimit> {
        self.presses.as_ref()
    }

    pub fn duration(&self) -> Option<&DurationLimit> {
        self.duration.as_ref()
    }

    pub fn payload(&self) -> &ActionPayload {
        &self.payload
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut dyn ActionHooks {
        self.payload.hooks_mut()
    }

    pub fn press_exhausted(&self) -> bool {
        self.presses.is_some_and(|p| p.is_exhausted())
    }

    /// Spend a press after a successful `on_press`; true when the budget ran out
    pub(crate) fn consume_press(&mut self) -> bool {
        self.presses.as_mut().is_some_and(|p| p.consume())
    }

    /// Count down the duration budget; true when it ran out
    pub(crate) fn drain_duration(&mut self, dt: f32) -> bool {
        self.duration.as_mut().is_some_and(|d| d.drain(dt))
    }

    /// Whether an unassign attempt would go through right now
    pub fn release_allowed(&self, world: &dyn World) -> bool {
        self.release == ReleaseState::Released || self.payload.hooks().can_release(world)
    }

    /// A pending release the action now allows, or a forced one
    pub fn release_due(&self, world: &dyn World) -> bool {
        match self.release {
            ReleaseState::Bound => false,
            ReleaseState::PendingRelease => self.payload.hooks().can_release(world),
            ReleaseState::Released => true,
        }
    }

    pub(crate) fn mark_pending(&mut self) {
        if self.release == ReleaseState::Bound {
            self.release = ReleaseState::PendingRelease;
        }
    }

    pub(crate) fn mark_released(&mut self) {
        self.release = ReleaseState::Released;
    }

    /// Refill budgets and clear release bookkeeping (bind time / re-acquisition)
    pub(crate) fn restore(&mut self) {
        if let Some(p) = self.presses.as_mut() {
            p.restore();
        }
        if let Some(d) = self.duration.as_mut() {
            d.restore();
        }
        self.release = ReleaseState::Bound;
    }

    /// Full reset on unbind
    pub(crate) fn reset(&mut self) {
        self.held = false;
        self.restore();
        self.payload.hooks_mut().reset();
    }

    /// Remaining budget as a fraction, the tighter of the two if both exist
    pub fn remaining_fraction(&self) -> Option<f32> {
        let presses = self.presses.map(|p| p.fraction());
        let duration = self.duration.map(|d| d.fraction());
        match (presses, duration) {
            (Some(p), Some(d)) => Some(p.min(d)),
            (p, d) => p.or(d),
        }
    }

    pub fn view(&self) -> SlotView {
        SlotView {
            glyph: self.definition.glyph(self.held),
            pressed: self.held,
            remaining: self.remaining_fraction(),
        }
    }

    pub fn as_magnetize(&self) -> Option<&Magnetize> {
        match &self.payload {
            ActionPayload::Magnetize(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_slam(&self) -> Option<&Slam> {
        match &self.payload {
            ActionPayload::Slam(s) => Some(s),
            _ => None,
        }
    }
}

/// Definitions for every kind, built once per tuning and shared by both paddles
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    definitions: Vec<ActionDefinition>,
    tuning: Tuning,
}

impl ActionCatalog {
    pub fn new(tuning: &Tuning) -> Self {
        let definitions = ActionKind::ALL
            .iter()
            .map(|&kind| ActionDefinition::from_limits(kind, tuning.actions.get(kind)))
            .collect();

        Self {
            definitions,
            tuning: tuning.clone(),
        }
    }

    pub fn definition(&self, kind: ActionKind) -> &ActionDefinition {
        &self.definitions[kind.index()]
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Fresh, unbound instance of `kind`
    pub fn instantiate(&self, kind: ActionKind) -> ActionInstance {
        let payload = match kind {
            ActionKind::Magnetize => ActionPayload::Magnetize(Magnetize::new(false)),
            ActionKind::MagnetizeOnce => ActionPayload::Magnetize(Magnetize::new(true)),
            ActionKind::Slam => ActionPayload::Slam(Slam::new(self.tuning.slam.clone())),
            ActionKind::GhostPaddle => ActionPayload::GhostPaddle(GhostPaddle::default()),
            ActionKind::GrowPaddle => {
                ActionPayload::Resize(Resize::new(ResizeMode::Grow, self.tuning.resize.clone()))
            }
            ActionKind::ShrinkPaddle => {
                ActionPayload::Resize(Resize::new(ResizeMode::Shrink, self.tuning.resize.clone()))
            }
            ActionKind::LaserFire => ActionPayload::LaserFire(LaserFire::default()),
        };
        ActionInstance::new(self.definition(kind).clone(), payload)
    }
}

/// One instance per kind, indexed by [`ActionKind::index`]
#[derive(Debug, Clone)]
pub struct ActionPool {
    instances: Vec<ActionInstance>,
}

impl ActionPool {
    pub fn new(catalog: &ActionCatalog) -> Self {
        Self {
            instances: ActionKind::ALL
                .iter()
                .map(|&kind| catalog.instantiate(kind))
                .collect(),
        }
    }

    pub fn get(&self, kind: ActionKind) -> &ActionInstance {
        &self.instances[kind.index()]
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> &mut ActionInstance {
        &mut self.instances[kind.index()]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ActionInstance> {
        self.instances.iter_mut()
    }
}
