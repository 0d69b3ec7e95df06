//! Slope projection: keeps grounded actors gliding along their floor plane.

use glam::DVec2;

use crate::actor::{Actor, ActorFlags};
use crate::motion::config::MotionConfig;
use crate::world::{GameWorld, Plane};

/// Project a desired horizontal displacement onto the actor's standing
/// surface.
///
/// Returns the (possibly deflected) displacement and the walk plane to hand
/// to the move attempt, or `None` when the actor is not walking a slope.
/// Safe to call once per sub-step; it is a pure function of the actor's
/// current position and the floor under it.
pub fn project(
    actor: &Actor,
    world: &dyn GameWorld,
    config: &MotionConfig,
    desired: DVec2,
) -> (DVec2, Option<Plane>) {
    if actor.flags.has(ActorFlags::NOCLIP) {
        return (desired, None);
    }
    if actor.flags.has(ActorFlags::FLY) && actor.flags.has(ActorFlags::NOGRAVITY) {
        return (desired, None);
    }

    let plane = world.find_floor_plane(actor.floor_sector, actor.pos);
    if plane.is_level() {
        return (desired, None);
    }
    if actor.pos.z != plane.z_at(actor.pos_xy()) {
        // Airborne over the slope; nothing to walk along.
        return (desired, None);
    }

    if desired == DVec2::ZERO {
        return (DVec2::ZERO, Some(plane));
    }

    let dest_z = plane.z_at(actor.pos_xy() + desired);
    if dest_z > actor.pos.z && plane.cz() < config.steep_slope {
        // Too steep to climb. Drop the uphill component so the actor crosses
        // the incline instead of walking up it.
        let uphill = -plane.normal.truncate().normalize();
        let climb = desired.dot(uphill);
        if climb > 0.0 {
            return (desired - uphill * climb, Some(plane));
        }
    }
    (desired, Some(plane))
}
