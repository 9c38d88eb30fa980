//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod action;
pub mod arena;
pub mod collision;
pub mod geom;
pub mod paddle;
pub mod slots;
pub mod state;
pub mod tick;
pub mod world;

pub use action::{
    ActionCatalog, ActionDefinition, ActionHooks, ActionInstance, ActionKind, ActionPool, Glyph,
    ReleaseState,
};
pub use arena::Arena;
pub use collision::CollisionResult;
pub use geom::Aabb;
pub use paddle::{InputAuthority, Paddle, PaddleBody, Side};
pub use slots::{Slot, SlotBank, SlotId};
pub use state::{MatchState, PickupKind};
pub use tick::{ButtonEdge, PaddleInput, TickInput, frame, tick};
pub use world::{
    ActionHud, BallControl, BallId, Contact, GhostId, IndicatorId, SlotView, SpatialQuery, Spawner,
    World,
};
