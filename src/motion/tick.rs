//! The per-actor tick driver.
//!
//! Sequences one simulation tick: anomaly and fast-path checks, item
//! effects, steep-slope slide-off, the horizontal sweep with contact event
//! dispatch, vertical motion or riding on another actor, and the finalize
//! pass that keeps portals, water level, and the timed state machine current.

use glam::DVec3;

use crate::actor::{Actor, ActorFlags};
use crate::motion::config::{CompatFlags, TickContext};
use crate::motion::{horizontal, vertical};
use crate::world::{ActivationFlags, GameWorld, Outcome, SectorAction};

/// Run one full simulation tick for the actor.
///
/// Any hook along the way may destroy the actor; the returned [`Outcome`]
/// tells the caller whether it still exists.
pub fn tick(actor: &mut Actor, world: &mut dyn GameWorld, ctx: &mut TickContext) -> Outcome {
    if actor.state.is_none() {
        log::warn!(
            "actor at ({}, {}) left without a state; destroying",
            actor.pos.x,
            actor.pos.y
        );
        return Outcome::Destroyed;
    }

    if actor.flags.has(ActorFlags::NOINTERACTION) {
        // Only do the minimally necessary things here to save time: honor
        // the time freezer, apply velocity, and keep the actor out of the
        // blocking index.
        if world.is_frozen(actor) {
            return Outcome::Continue;
        }
        if actor.vel != DVec3::ZERO || !actor.flags.has(ActorFlags::NOBLOCKMAP) {
            world.unlink(actor);
            actor.flags.insert(ActorFlags::NOBLOCKMAP);
            actor.pos += actor.vel;
            world.check_portal_transition(actor, false);
            world.link(actor);
        }
        return Outcome::Continue;
    }

    if !actor.is_predicting() {
        // Power-up effects run here so their order follows the inventory,
        // not the thinker table.
        if world.item_effects(actor).is_destroyed() {
            return Outcome::Destroyed;
        }
    }

    if world.is_frozen(actor) {
        return Outcome::Continue;
    }

    // Standing on a steep slope: fall down it.
    if actor.flags.has(ActorFlags::SOLID)
        && !actor.flags.has(ActorFlags::NOCLIP)
        && !actor.flags.has(ActorFlags::NOGRAVITY)
        && !actor.flags.has(ActorFlags::NOBLOCKMAP)
        && actor.vel.z <= 0.0
        && actor.floor_z == actor.pos.z
    {
        let probe = DVec3::new(actor.pos.x, actor.pos.y, actor.floor_z);
        let floor_plane = world.find_floor_plane(actor.floor_sector, probe);

        if floor_plane.cz() < ctx.config.steep_slope
            && floor_plane.z_at(actor.pos_xy()) <= actor.floor_z
        {
            let mut do_push = true;

            if floor_plane.cz() > ctx.config.steep_slope * 2.0 / 3.0 {
                // Moderately steep only pushes when no adjacent walkable
                // floor is close enough to stand on instead.
                for &sec_id in &actor.touching {
                    let sec = world.sector(sec_id);
                    if sec.floor.cz() >= ctx.config.steep_slope
                        && floor_plane.z_at(actor.pos_xy())
                            >= actor.pos.z - actor.max_step_height
                    {
                        do_push = false;
                        break;
                    }
                }
            }
            if do_push {
                actor.vel.x += floor_plane.normal.x;
                actor.vel.y += floor_plane.normal.y;
            }
        }
    }

    // Horizontal motion. The integrator resets the contact scratch; hold on
    // to last tick's floor/ceiling contacts for change detection.
    let old_contact_floor = actor.contacts.floor;
    let old_contact_ceiling = actor.contacts.ceiling;

    let (old_floor_z, outcome) = horizontal::advance(actor, world, ctx);
    if outcome.is_destroyed() {
        return Outcome::Destroyed;
    }

    if !actor.is_predicting() {
        if let Some(floor) = actor.contacts.floor {
            if old_contact_floor != Some(floor) && world.sector(floor).has_action_target {
                if world
                    .trigger_sector_action(actor, floor, SectorAction::HitFloor)
                    .is_destroyed()
                {
                    return Outcome::Destroyed;
                }
            }
        }
        if let Some(ceiling) = actor.contacts.ceiling {
            if old_contact_ceiling != Some(ceiling) && world.sector(ceiling).has_action_target {
                if world
                    .trigger_sector_action(actor, ceiling, SectorAction::HitCeiling)
                    .is_destroyed()
                {
                    return Outcome::Destroyed;
                }
            }
        }
    }

    if actor.vel.x == 0.0 && actor.vel.y == 0.0 {
        // Actors at rest.
        if actor.flags.has(ActorFlags::BLASTED) {
            actor.flags.remove(ActorFlags::BLASTED);
        }
        if actor.flags.has(ActorFlags::TOUCHY) && !actor.is_sentient() {
            // Arm a mine which has come to rest.
            actor.flags.insert(ActorFlags::ARMED);
        }
    }

    if actor.vel.z != 0.0 || actor.contacts.actor.is_some() || actor.pos.z != actor.floor_z {
        // Handle z velocity and gravity.
        if actor.passes_over_actors() && !ctx.compat.has(CompatFlags::NO_PASS_ACTORS) {
            match world.check_resting_on_actor(actor) {
                None => {
                    if vertical::advance(actor, world, ctx, old_floor_z).is_destroyed() {
                        return Outcome::Destroyed;
                    }
                    actor.flags.remove(ActorFlags::ON_ACTOR);
                }
                Some(ride) => {
                    if ride.top - actor.pos.z <= actor.max_step_height {
                        if let Some(player) = actor.player.as_mut() {
                            player.view_height -= ride.top - actor.pos.z;
                            let delta = player.pending_view_delta();
                            if delta > player.delta_view_height {
                                player.delta_view_height = delta;
                            }
                        }
                        actor.pos.z = ride.top;
                    }
                    // Trigger the bump special for as long as the actor
                    // stands on it, not just on landing; gravity keeps
                    // bumping it, and walking onto it without a drop still
                    // counts. The cooldown keeps it from firing every tick.
                    let eligible = actor.player.is_some()
                        || (ride.activation.has(ActivationFlags::MONSTER_TRIGGER)
                            && actor.flags.has(ActorFlags::MONSTER))
                        || (ride.activation.has(ActivationFlags::MISSILE_TRIGGER)
                            && actor.is_missile());
                    if ride.bump_special
                        && eligible
                        && ctx.map_time > ride.last_bump
                        && !actor.is_predicting()
                    {
                        world.activate_bump_special(ride.id, actor);
                    }
                    actor.flags.insert(ActorFlags::ON_ACTOR);
                    actor.vel.z = 0.0;
                    if world.crash_landing(actor).is_destroyed() {
                        return Outcome::Destroyed;
                    }
                }
            }
        } else if vertical::advance(actor, world, ctx, old_floor_z).is_destroyed() {
            return Outcome::Destroyed;
        }
    } else if actor.pos.z <= actor.floor_z {
        // Already on the ground with no z work to do.
        if world.crash_landing(actor).is_destroyed() {
            return Outcome::Destroyed;
        }
    }

    world.check_portal_transition(actor, true);
    world.update_water_level(actor);

    if actor.state.is_none() {
        return Outcome::Destroyed;
    }
    if !world.check_no_delay(actor) {
        // Freed itself.
        return Outcome::Destroyed;
    }

    world.refresh_render_linkage(actor);

    if actor.tics != -1 {
        actor.tics -= 1;
        // tics <= 0 rather than == 0 so that zero-tic spawn states work.
        if actor.tics <= 0 && !world.advance_state(actor) {
            // Freed itself mid-transition.
            return Outcome::Destroyed;
        }
    }
    Outcome::Continue
}
