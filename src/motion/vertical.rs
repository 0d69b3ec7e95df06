//! Vertical motion: gravity, liquid buoyancy and friction, floor/ceiling
//! clamping with contact event dispatch.

use glam::DVec3;

use crate::actor::{Actor, ActorFlags, DamageKind, WaterLevel};
use crate::motion::config::TickContext;
use crate::world::{ExtraFloorFlags, GameWorld, Outcome, SectorAction};

/// Advance the actor vertically by one tick.
///
/// `old_floor_z` is the floor height the horizontal integrator reported from
/// before its sweep; it distinguishes running off a ledge from the apex of a
/// jump.
pub fn advance(
    actor: &mut Actor,
    world: &mut dyn GameWorld,
    ctx: &TickContext,
    old_floor_z: f64,
) -> Outcome {
    let old_z = actor.pos.z;
    let grav = actor.gravity;

    actor.pos.z += actor.vel.z;

    // ================================================================
    // Gravity and buoyancy
    // ================================================================

    if actor.pos.z > actor.floor_z && !actor.flags.has(ActorFlags::NOGRAVITY) {
        let start_vel_z = actor.vel.z;

        let player_coasting = actor.player.as_ref().is_some_and(|p| !p.has_move_input);
        if actor.water_level == WaterLevel::None || (actor.player.is_some() && player_coasting) {
            // Double gravity only when running off a ledge. The apex of a
            // jump looks identical except that the floor held still.
            if actor.vel.z == 0.0 && old_floor_z > actor.floor_z && actor.pos.z == old_floor_z {
                actor.vel.z -= grav + grav;
            } else {
                actor.vel.z -= grav;
            }
        }

        if actor.player.is_none() && actor.water_level >= WaterLevel::Feet {
            // Trend toward the body's natural sink speed, with 100 units of
            // mass sinking like a player.
            let sink = if actor.flags.has(ActorFlags::PICKUP)
                && !actor.flags.has(ActorFlags::MONSTER)
            {
                // Pickup items don't sink if placed and drop slowly if
                // dropped.
                if actor.flags.has(ActorFlags::DROPPED) {
                    -ctx.config.water_sink_speed / 8.0
                } else {
                    0.0
                }
            } else {
                -ctx.config.water_sink_speed * actor.mass.clamp(1.0, 4000.0)
                    / ctx.config.sink_reference_mass
            };

            if actor.vel.z < sink {
                // Dropping too fast; brake toward the sink speed.
                actor.vel.z -= (sink * 2.0).max(-ctx.config.sink_rate_limit);
                if actor.vel.z > sink {
                    actor.vel.z = sink;
                }
            } else if actor.vel.z > sink {
                // Too slow or rising; settle toward the sink speed.
                actor.vel.z = start_vel_z + (sink / 3.0).max(-ctx.config.sink_rate_limit);
                if actor.vel.z < sink {
                    actor.vel.z = sink;
                }
            }
        }
    }

    if actor.water_level > WaterLevel::None
        && !actor.flags.has(ActorFlags::NOGRAVITY)
        && !actor.flags.has(ActorFlags::NOFRICTION)
    {
        // The liquid may come from a swimmable stacked volume rather than
        // the sector itself; the volume containing the body center wins.
        let mut friction = None;
        let sector = world.sector(actor.sector);
        for rover in &sector.extra_floors {
            if !rover.flags.has(ExtraFloorFlags::EXISTS) {
                continue;
            }
            if !rover.flags.has(ExtraFloorFlags::SWIMMABLE) {
                continue;
            }
            if actor.pos.z >= rover.top.z_at(actor.pos_xy())
                || actor.center() < rover.bottom.z_at(actor.pos_xy())
            {
                continue;
            }
            friction = Some(rover.friction);
            break;
        }
        let friction = friction.unwrap_or(sector.friction);
        actor.vel.z *= friction;
    }

    // ================================================================
    // Clip movement
    // ================================================================

    if actor.pos.z <= actor.floor_z {
        // Hit the floor.
        let (has_target, floor_plane) = {
            let sector = world.sector(actor.sector);
            (sector.has_action_target, sector.floor)
        };
        if !actor.is_predicting()
            && has_target
            && floor_plane.z_at(actor.pos_xy()) == actor.floor_z
        {
            let sector_id = actor.sector;
            if world
                .trigger_sector_action(actor, sector_id, SectorAction::HitFloor)
                .is_destroyed()
            {
                return Outcome::Destroyed;
            }
        }
        if world
            .check_3d_floor_hit(actor, actor.floor_z, true)
            .is_destroyed()
        {
            return Outcome::Destroyed;
        }
        // The action might have teleported the actor clear of the floor, so
        // re-check before clamping.
        if actor.pos.z <= actor.floor_z {
            actor.contacts.floor = Some(actor.sector);
            if actor.flags.has(ActorFlags::MONSTER) && actor.vel.z < ctx.config.fall_damage_speed {
                if world.fall_damage(actor).is_destroyed() {
                    return Outcome::Destroyed;
                }
            }
            actor.pos.z = actor.floor_z;
            if actor.vel.z < 0.0 {
                // Splashes, decals, terrain effects.
                if world.floor_impact(actor).is_destroyed() {
                    return Outcome::Destroyed;
                }
                if actor.damage_kind == DamageKind::Ice && actor.vel.z < ctx.config.landing_speed {
                    // A frozen body shatters where it lands: freeze the
                    // state machine for one tic and stop dead.
                    actor.tics = 1;
                    actor.vel = DVec3::ZERO;
                    return Outcome::Continue;
                }
                if actor.flags.has(ActorFlags::SMASHABLE) {
                    let health = actor.health;
                    if world
                        .apply_damage(actor, health, DamageKind::Smash)
                        .is_destroyed()
                    {
                        return Outcome::Destroyed;
                    }
                }
                actor.vel.z = 0.0;
            }
            if world.crash_landing(actor).is_destroyed() {
                return Outcome::Destroyed;
            }
        }
    }

    if actor.flags.has(ActorFlags::FLOORCLIP) {
        world.adjust_floor_clip(actor);
    }

    if actor.top() > actor.ceiling_z {
        // Hit the ceiling.
        let (has_target, ceiling_plane) = {
            let sector = world.sector(actor.sector);
            (sector.has_action_target, sector.ceiling)
        };
        if !actor.is_predicting()
            && has_target
            && ceiling_plane.z_at(actor.pos_xy()) == actor.ceiling_z
        {
            let sector_id = actor.sector;
            if world
                .trigger_sector_action(actor, sector_id, SectorAction::HitCeiling)
                .is_destroyed()
            {
                return Outcome::Destroyed;
            }
        }
        if world
            .check_3d_ceiling_hit(actor, actor.ceiling_z, true)
            .is_destroyed()
        {
            return Outcome::Destroyed;
        }
        if actor.top() > actor.ceiling_z {
            actor.contacts.ceiling = Some(actor.sector);
            actor.pos.z = actor.ceiling_z - actor.height;
            if actor.vel.z > 0.0 {
                actor.vel.z = 0.0;
            }
        }
    }

    world.check_fake_floor_triggers(actor, old_z);
    Outcome::Continue
}
