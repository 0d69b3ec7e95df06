//! Actor state: the simulated entity the motion engine advances.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::world::SectorId;

/// Handle to an actor, owned and resolved by the host world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Handle to a behavior state in the host's state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(pub u32);

/// Behavior flags controlling how an actor moves and collides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActorFlags(pub u32);

impl ActorFlags {
    /// Blocks other solid actors.
    pub const SOLID: Self = Self(1 << 0);

    /// Projectile: never slides, explodes or stops on impact.
    pub const MISSILE: Self = Self(1 << 1);

    /// Ignores all collision.
    pub const NOCLIP: Self = Self(1 << 2);

    /// Free-camera style clipping exemption (no-clip without flight).
    pub const NOCLIP2: Self = Self(1 << 3);

    /// Gravity never applies.
    pub const NOGRAVITY: Self = Self(1 << 4);

    /// Not linked into the world's blocking spatial index.
    pub const NOBLOCKMAP: Self = Self(1 << 5);

    /// Pickup item (may be collected by touch).
    pub const PICKUP: Self = Self(1 << 6);

    /// Pickup item dropped by a dead actor rather than placed by the map.
    pub const DROPPED: Self = Self(1 << 7);

    /// Dead body.
    pub const CORPSE: Self = Self(1 << 8);

    /// Monster-classed actor (takes fall damage, can trigger monster specials).
    pub const MONSTER: Self = Self(1 << 9);

    /// Flying actor.
    pub const FLY: Self = Self(1 << 10);

    /// Slides along walls when a move is blocked.
    pub const SLIDE: Self = Self(1 << 11);

    /// Was violently thrown; slides until it comes to rest.
    pub const BLASTED: Self = Self(1 << 12);

    /// Currently standing on top of another actor.
    pub const ON_ACTOR: Self = Self(1 << 13);

    /// May move over/under other actors instead of being stopped by them.
    pub const PASS_ACTOR: Self = Self(1 << 14);

    /// Visually sinks into liquid floors; needs floor-clip adjustment.
    pub const FLOORCLIP: Self = Self(1 << 15);

    /// Skips full simulation: velocity applied directly, no collision.
    pub const NOINTERACTION: Self = Self(1 << 16);

    /// Currently falling off a ledge (set by external drop-off logic).
    pub const FALLING: Self = Self(1 << 17);

    /// Proximity hazard that arms once it comes to rest.
    pub const TOUCHY: Self = Self(1 << 18);

    /// Armed proximity hazard.
    pub const ARMED: Self = Self(1 << 19);

    /// Destroyed by the impact of landing (glass sculptures and the like).
    pub const SMASHABLE: Self = Self(1 << 20);

    /// Immune to liquid friction.
    pub const NOFRICTION: Self = Self(1 << 21);

    /// Check whether all of the given flags are set.
    #[inline]
    pub fn has(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Set the given flags.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the given flags.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for ActorFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// How an actor reacts when a horizontal move is blocked, resolved once per
/// actor instead of re-deriving it from scattered bit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BounceStyle {
    /// No bouncing; fall through to slide/stop handling.
    #[default]
    None,
    /// MBF-style bouncer: deflects off walls and actors without losing its
    /// velocity to the blocked-move reset.
    Mbf,
}

/// Damage-type tag carried by an actor, relevant to landing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DamageKind {
    #[default]
    Normal,
    /// Frozen death: shatters in place when it lands hard.
    Ice,
    /// Smash damage dealt to SMASHABLE actors on landing.
    Smash,
}

/// How deep the actor currently sits in liquid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum WaterLevel {
    #[default]
    None,
    Feet,
    Waist,
    Eyes,
}

/// Player-only state the motion engine consults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Client-side forecast run: persistent side effects must not fire.
    pub predicting: bool,

    /// Forward/side movement input is active this tick.
    pub has_move_input: bool,

    /// Nominal view height for this player (camera offset target).
    pub base_view_height: f64,

    /// Current (smoothed) view height.
    pub view_height: f64,

    /// Pending per-tick view height correction.
    pub delta_view_height: f64,
}

impl PlayerInfo {
    /// The per-tick correction that would restore the nominal view height.
    pub fn pending_view_delta(&self) -> f64 {
        (self.base_view_height - self.view_height) / 8.0
    }
}

/// Blocking references produced while resolving motion.
///
/// Scratch state: reset at the start of every horizontal advance. The
/// floor/ceiling entries are the only ones compared across ticks (contact
/// sector-action dispatch); the rest are consumed within the same tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Contacts {
    /// Actor that halted the last blocked move.
    pub actor: Option<ActorId>,
    /// Line that halted the last blocked move.
    pub line: Option<crate::world::LineId>,
    /// Sector whose floor the actor ran into.
    pub floor: Option<SectorId>,
    /// Sector whose ceiling the actor ran into.
    pub ceiling: Option<SectorId>,
    /// Stacked floor (index within its sector) the actor ran into.
    pub extra_floor: Option<u32>,
}

/// A simulated mobile entity.
///
/// Spawning, destruction, and most gameplay state live in the host; this is
/// the slice of an actor the motion engine reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: DVec3,
    pub vel: DVec3,
    /// Facing angle in radians. Portals that rotate the actor update this,
    /// and the horizontal sweep uses the delta to keep trajectories straight.
    pub yaw: f64,

    pub radius: f64,
    pub height: f64,
    pub mass: f64,
    /// Effective gravity per tick (host resolves level and per-actor scale).
    pub gravity: f64,
    /// Tallest ledge this actor can step up.
    pub max_step_height: f64,

    pub flags: ActorFlags,
    pub bounce: BounceStyle,
    pub damage_kind: DamageKind,
    pub health: i32,

    /// Cached height of the highest floor under the actor.
    pub floor_z: f64,
    /// Cached height of the lowest ceiling over the actor.
    pub ceiling_z: f64,
    /// Lowest floor the actor could drop onto from its current position.
    pub dropoff_z: f64,
    /// Sector providing the current floor.
    pub floor_sector: SectorId,
    /// Sector the actor's center currently occupies.
    pub sector: SectorId,
    /// Sectors the actor's radius overlaps (maintained by the host).
    pub touching: Vec<SectorId>,

    pub water_level: WaterLevel,

    /// Current behavior state, or `None` for an actor that lost its state
    /// (an anomaly the tick driver reports and resolves by destruction).
    pub state: Option<StateId>,
    /// Tics remaining in the current state; -1 means infinite.
    pub tics: i32,

    pub player: Option<PlayerInfo>,

    pub contacts: Contacts,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: DVec3::ZERO,
            vel: DVec3::ZERO,
            yaw: 0.0,
            radius: 16.0,
            height: 56.0,
            mass: 100.0,
            gravity: 1.0,
            max_step_height: 24.0,
            flags: ActorFlags::default(),
            bounce: BounceStyle::None,
            damage_kind: DamageKind::Normal,
            health: 1000,
            floor_z: 0.0,
            ceiling_z: 128.0,
            dropoff_z: 0.0,
            floor_sector: SectorId(0),
            sector: SectorId(0),
            touching: Vec::new(),
            water_level: WaterLevel::None,
            state: Some(StateId(0)),
            tics: -1,
            player: None,
            contacts: Contacts::default(),
        }
    }
}

impl Actor {
    /// Create an actor at the given position.
    pub fn at(pos: DVec3) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    /// Top of the actor's collision box.
    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.z + self.height
    }

    /// Vertical center of the actor's body.
    #[inline]
    pub fn center(&self) -> f64 {
        self.pos.z + self.height / 2.0
    }

    /// Horizontal position.
    #[inline]
    pub fn pos_xy(&self) -> DVec2 {
        self.pos.truncate()
    }

    /// Horizontal velocity.
    #[inline]
    pub fn vel_xy(&self) -> DVec2 {
        self.vel.truncate()
    }

    #[inline]
    pub fn is_missile(&self) -> bool {
        self.flags.has(ActorFlags::MISSILE)
    }

    /// Slides along blocking geometry instead of stopping dead.
    #[inline]
    pub fn can_slide(&self) -> bool {
        self.flags.has(ActorFlags::SLIDE) || self.flags.has(ActorFlags::BLASTED)
    }

    /// May end up resting on top of other actors.
    #[inline]
    pub fn passes_over_actors(&self) -> bool {
        self.flags.has(ActorFlags::PASS_ACTOR) || self.flags.has(ActorFlags::PICKUP)
    }

    /// Part of a client-side forecast run.
    #[inline]
    pub fn is_predicting(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.predicting)
    }

    /// Alive and capable of acting on its own (players and live monsters).
    #[inline]
    pub fn is_sentient(&self) -> bool {
        self.health > 0 && (self.player.is_some() || self.flags.has(ActorFlags::MONSTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_flags() {
        let mut flags = ActorFlags::default();
        assert!(!flags.has(ActorFlags::SOLID));

        flags.insert(ActorFlags::SOLID | ActorFlags::MONSTER);
        assert!(flags.has(ActorFlags::SOLID));
        assert!(flags.has(ActorFlags::MONSTER));
        assert!(flags.has(ActorFlags::SOLID | ActorFlags::MONSTER));
        assert!(!flags.has(ActorFlags::MISSILE));

        flags.remove(ActorFlags::SOLID);
        assert!(!flags.has(ActorFlags::SOLID));
        assert!(flags.has(ActorFlags::MONSTER));
    }

    #[test]
    fn test_water_level_ordering() {
        assert!(WaterLevel::None < WaterLevel::Feet);
        assert!(WaterLevel::Feet < WaterLevel::Waist);
        assert!(WaterLevel::Waist < WaterLevel::Eyes);
    }

    #[test]
    fn test_sentience() {
        let mut actor = Actor::default();
        assert!(!actor.is_sentient(), "inert decoration is not sentient");

        actor.flags.insert(ActorFlags::MONSTER);
        assert!(actor.is_sentient(), "live monster is sentient");

        actor.health = 0;
        assert!(!actor.is_sentient(), "dead monster is not sentient");

        actor.health = 100;
        actor.flags.remove(ActorFlags::MONSTER);
        actor.player = Some(PlayerInfo::default());
        assert!(actor.is_sentient(), "player is sentient");
    }

    #[test]
    fn test_body_extents() {
        let mut actor = Actor::at(glam::dvec3(0.0, 0.0, 10.0));
        actor.height = 56.0;
        assert_eq!(actor.top(), 66.0);
        assert_eq!(actor.center(), 38.0);
    }
}
