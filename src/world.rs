//! World geometry data and the host-game collaborator interface.
//!
//! The motion engine never owns level geometry or gameplay logic. It reads
//! [`Sector`] data the host exposes and calls back through [`GameWorld`] for
//! everything else: collision sweeps, portals, sector specials, damage, and
//! spatial-index maintenance.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId, DamageKind};
use crate::motion::TickContext;

/// Handle to a sector, resolved by the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectorId(pub u32);

/// Handle to a wall line, resolved by the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(pub u32);

/// Friction applied on ordinary ground when the host has no better answer.
pub const DEFAULT_FRICTION: f64 = 0.90625;

/// A floor or ceiling plane: `normal · p + d = 0`.
///
/// Floor planes have `normal.z > 0`, ceiling planes `normal.z < 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: DVec3,
    pub d: f64,
}

impl Plane {
    /// A horizontal floor at the given height.
    pub fn level_floor(height: f64) -> Self {
        Self {
            normal: DVec3::Z,
            d: -height,
        }
    }

    /// A horizontal ceiling at the given height.
    pub fn level_ceiling(height: f64) -> Self {
        Self {
            normal: -DVec3::Z,
            d: height,
        }
    }

    /// Height of the plane above the given horizontal position.
    #[inline]
    pub fn z_at(&self, p: DVec2) -> f64 {
        -(self.d + self.normal.x * p.x + self.normal.y * p.y) / self.normal.z
    }

    /// Z component of the normal; the steepness measure (1.0 = flat floor).
    #[inline]
    pub fn cz(&self) -> f64 {
        self.normal.z
    }

    /// Whether the plane is perfectly horizontal.
    #[inline]
    pub fn is_level(&self) -> bool {
        self.normal.x == 0.0 && self.normal.y == 0.0
    }
}

/// Flags on a stacked (3D) floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtraFloorFlags(pub u8);

impl ExtraFloorFlags {
    /// The stacked floor is currently present (not disabled by a special).
    pub const EXISTS: Self = Self(1 << 0);

    /// Solid: actors can stand on its top surface.
    pub const SOLID: Self = Self(1 << 1);

    /// Swimmable liquid volume.
    pub const SWIMMABLE: Self = Self(1 << 2);

    #[inline]
    pub fn has(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for ExtraFloorFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A stacked floor/ceiling pair layered inside a sector's vertical span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraFloor {
    pub flags: ExtraFloorFlags,
    pub top: Plane,
    pub bottom: Plane,
    /// Friction of the volume (liquid drag for swimmable volumes).
    pub friction: f64,
}

/// A world region with its own floor and ceiling surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub floor: Plane,
    pub ceiling: Plane,
    pub friction: f64,
    pub extra_floors: Vec<ExtraFloor>,
    /// Whether the sector has an action target that reacts to floor/ceiling
    /// contact events.
    pub has_action_target: bool,
}

impl Sector {
    /// A flat, empty sector spanning the given heights.
    pub fn open(floor_z: f64, ceiling_z: f64) -> Self {
        Self {
            floor: Plane::level_floor(floor_z),
            ceiling: Plane::level_ceiling(ceiling_z),
            friction: DEFAULT_FRICTION,
            extra_floors: Vec::new(),
            has_action_target: false,
        }
    }
}

/// Result of a call that may have run game logic with the power to destroy
/// the actor it was handed. Checked at every call site before the actor is
/// touched again.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Destroyed,
}

impl Outcome {
    #[inline]
    pub fn is_destroyed(self) -> bool {
        self == Outcome::Destroyed
    }
}

/// What halted a blocked move attempt. Produced by [`GameWorld::attempt_move`]
/// and consumed immediately by the horizontal integrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blockage {
    pub actor: Option<ActorId>,
    pub line: Option<LineId>,
    /// Sector whose floor the attempt penetrated (blocked by rising ground).
    pub floor_sector: Option<SectorId>,
    /// Sector whose ceiling the attempt penetrated.
    pub ceiling_sector: Option<SectorId>,
    /// Stacked floor (index within its sector) that blocked the attempt.
    pub extra_floor: Option<u32>,
}

/// Result of one move attempt.
#[must_use]
#[derive(Debug, Clone, Copy)]
pub enum MoveAttempt {
    /// The actor was relocated; possibly somewhere other than the requested
    /// target if it crossed a teleporter or portal.
    Moved,
    /// The move was rejected; the actor did not change position.
    Blocked(Blockage),
    /// A special triggered by the attempt destroyed the actor.
    Destroyed,
}

/// Which actors may trigger a bump special on a ridden object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivationFlags(pub u8);

impl ActivationFlags {
    pub const MONSTER_TRIGGER: Self = Self(1 << 0);
    pub const MISSILE_TRIGGER: Self = Self(1 << 1);

    #[inline]
    pub fn has(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// Snapshot of the actor another actor is resting on. Transient: produced by
/// [`GameWorld::check_resting_on_actor`] and consumed within the same tick.
#[derive(Debug, Clone, Copy)]
pub struct Ride {
    pub id: ActorId,
    /// Top of the ridden actor's collision box.
    pub top: f64,
    /// The ridden actor runs a special when bumped.
    pub bump_special: bool,
    pub activation: ActivationFlags,
    /// Map time of the last bump activation (cooldown stamp).
    pub last_bump: u32,
}

/// Contact-sector event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorAction {
    HitFloor,
    HitCeiling,
}

/// Everything the motion engine asks of the host game.
///
/// Hook methods returning [`Outcome`] may run arbitrary game logic, including
/// destroying the actor passed to them; the engine checks the outcome before
/// touching the actor again. Hooks with no meaning in a given embedding can
/// keep their default no-op implementations.
pub trait GameWorld {
    /// Resolve a sector handle.
    fn sector(&self, id: SectorId) -> &Sector;

    /// Sweep the actor toward `target`. On success the world has relocated
    /// the actor (possibly through a portal or teleporter, updating position,
    /// yaw, sector, and cached floor/ceiling heights). On failure it reports
    /// what blocked the move and leaves the actor where it was.
    fn attempt_move(
        &mut self,
        actor: &mut Actor,
        target: DVec2,
        allow_dropoff: bool,
        walk_plane: Option<&Plane>,
        ctx: &TickContext,
    ) -> MoveAttempt;

    /// The plane of the floor under `pos`, considering stacked floors.
    fn find_floor_plane(&self, sector: SectorId, pos: DVec3) -> Plane {
        self.sector(sector).floor
    }

    /// The actor this actor is resting on top of, if any.
    fn check_resting_on_actor(&self, _actor: &Actor) -> Option<Ride> {
        None
    }

    /// Deflect an MBF bouncer off another actor. Returns whether the bounce
    /// was handled (velocity already redirected).
    fn bounce_off_actor(&mut self, _actor: &mut Actor, _other: ActorId) -> bool {
        false
    }

    /// Deflect an MBF bouncer off the blocking wall.
    fn bounce_off_wall(&mut self, _actor: &mut Actor) -> bool {
        false
    }

    /// Slide the actor along the surface that blocked it, mutating velocity.
    /// `steps` is the sub-step count the displacement was divided by.
    fn slide_along_surface(
        &mut self,
        _actor: &mut Actor,
        _delta: DVec2,
        _steps: i32,
        _ctx: &TickContext,
    ) {
    }

    /// Friction coefficient of the ground under the actor.
    fn ground_friction(&self, _actor: &Actor) -> f64 {
        DEFAULT_FRICTION
    }

    /// Run the sector's action target for a floor/ceiling contact.
    fn trigger_sector_action(
        &mut self,
        _actor: &mut Actor,
        _sector: SectorId,
        _action: SectorAction,
    ) -> Outcome {
        Outcome::Continue
    }

    /// Stacked-floor contact hook. With `finalize` false this only records
    /// the contact; with `finalize` true it runs the contact actions.
    fn check_3d_floor_hit(&mut self, _actor: &mut Actor, _z: f64, _finalize: bool) -> Outcome {
        Outcome::Continue
    }

    /// Stacked-ceiling counterpart of [`Self::check_3d_floor_hit`].
    fn check_3d_ceiling_hit(&mut self, _actor: &mut Actor, _z: f64, _finalize: bool) -> Outcome {
        Outcome::Continue
    }

    /// Floor impact effects: splashes, decals, terrain reactions.
    fn floor_impact(&mut self, _actor: &mut Actor) -> Outcome {
        Outcome::Continue
    }

    /// Fall damage for a monster-classed actor landing too fast.
    fn fall_damage(&mut self, _actor: &mut Actor) -> Outcome {
        Outcome::Continue
    }

    /// Apply damage to the actor.
    fn apply_damage(&mut self, _actor: &mut Actor, _amount: i32, _kind: DamageKind) -> Outcome {
        Outcome::Continue
    }

    /// The actor's landing/crash behavior (state transitions on touchdown).
    fn crash_landing(&mut self, _actor: &mut Actor) -> Outcome {
        Outcome::Continue
    }

    /// Run the bump special of a ridden actor, with `actor` as activator.
    /// Returns whether the special ran; the host records the cooldown stamp
    /// on the target.
    fn activate_bump_special(&mut self, _target: ActorId, _actor: &mut Actor) -> bool {
        false
    }

    /// Dispatch equipped-item effects in inventory order.
    fn item_effects(&mut self, _actor: &mut Actor) -> Outcome {
        Outcome::Continue
    }

    /// Remove the actor from the spatial index before a direct position write.
    fn unlink(&mut self, _actor: &mut Actor) {}

    /// Re-insert the actor into the spatial index.
    fn link(&mut self, _actor: &mut Actor) {}

    /// Detect and perform a sector-portal transition at the current position.
    fn check_portal_transition(&mut self, _actor: &mut Actor, _moved: bool) {}

    /// Recompute the actor's water immersion level.
    fn update_water_level(&mut self, _actor: &mut Actor) {}

    /// Adjust the visual floor-clip offset for liquid floors.
    fn adjust_floor_clip(&mut self, _actor: &mut Actor) {}

    /// Height-threshold sector specials keyed on crossing a fake floor.
    fn check_fake_floor_triggers(&mut self, _actor: &mut Actor, _old_z: f64) {}

    /// Refresh render-sector linkage after movement.
    fn refresh_render_linkage(&mut self, _actor: &mut Actor) {}

    /// Whether the actor is held by a time freezer this tick.
    fn is_frozen(&self, _actor: &Actor) -> bool {
        false
    }

    /// No-delay state check. Returns false if the actor freed itself.
    fn check_no_delay(&mut self, _actor: &mut Actor) -> bool {
        true
    }

    /// Advance the actor to its next behavior state. Returns false if the
    /// actor freed itself during the transition.
    fn advance_state(&mut self, _actor: &mut Actor) -> bool {
        true
    }
}
