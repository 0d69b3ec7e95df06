//! Sectormove — deterministic actor movement for sector-based 3D worlds.
//!
//! This crate advances mobile entities ("actors") through a tile/sector world
//! one discrete tick at a time: sub-stepped horizontal collision sweeps with
//! slope projection and wall sliding, vertical integration with gravity,
//! liquid buoyancy and floor/ceiling clamping, and the per-actor tick
//! orchestration that sequences the two with riding, bump-special, and
//! portal-continuation logic.
//!
//! # Architecture
//!
//! The engine is split into two main pieces:
//!
//! - **World interface** ([`GameWorld`]): everything the host game owns —
//!   move-attempt sweeps, portals, sector specials, damage, spatial index
//!   maintenance. The core only sees the trait.
//! - **Motion**: the integrators and the tick driver
//!   ([`motion::horizontal`], [`motion::vertical`], [`motion::tick`]).
//!
//! # Design Principles
//!
//! 1. **Determinism**: actors are processed single-threaded in scheduler
//!    order; identical inputs produce identical results, which lockstep
//!    replication depends on.
//! 2. **Explicit destruction**: any world hook may destroy the actor it was
//!    handed. Every such call returns an [`Outcome`] that is checked before
//!    any further field access.
//! 3. **Transient blockage**: blocked moves produce a [`Blockage`] record
//!    consumed immediately; only the floor/ceiling contact pair survives a
//!    tick, for contact-change event dispatch.

pub mod actor;
pub mod motion;
pub mod world;

#[cfg(test)]
pub(crate) mod test_world;

pub use actor::{
    Actor, ActorFlags, ActorId, BounceStyle, Contacts, DamageKind, PlayerInfo, StateId, WaterLevel,
};
pub use motion::{tick::tick, CompatFlags, MotionConfig, TickContext};
pub use world::{
    ActivationFlags, Blockage, ExtraFloor, ExtraFloorFlags, GameWorld, LineId, MoveAttempt,
    Outcome, Plane, Ride, Sector, SectorAction, SectorId,
};
