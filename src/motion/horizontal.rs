//! Horizontal motion: the sub-stepped collision sweep.
//!
//! One tick of horizontal movement is divided into sub-steps no longer than
//! the actor's radius, so thin lines cannot be skipped by a fast mover. Each
//! sub-step is attempted through the world's collision query; blocked steps
//! fall through a bounce/slide/stop policy, and successful steps that land
//! somewhere other than the requested target are treated as teleporter or
//! portal transitions.

use glam::DVec2;

use crate::actor::{Actor, ActorFlags, BounceStyle, Contacts, WaterLevel};
use crate::motion::config::{CompatFlags, TickContext};
use crate::motion::slope;
use crate::world::{ExtraFloorFlags, GameWorld, MoveAttempt, Outcome};

/// Advance the actor horizontally by one tick.
///
/// Returns the floor height cached before the move (the vertical integrator
/// needs it to tell a ledge falloff from a jump apex) and whether the actor
/// survived the sweep's side effects.
pub fn advance(
    actor: &mut Actor,
    world: &mut dyn GameWorld,
    ctx: &mut TickContext,
) -> (f64, Outcome) {
    let old_floor_z = actor.floor_z;

    actor.contacts = Contacts::default();

    // Speed cap: fixed-point builds overflowed at 32768, and even in doubles
    // an unbounded sweep destabilizes.
    if actor.vel.length_squared() >= ctx.config.velocity_ceiling * ctx.config.velocity_ceiling {
        actor.vel = actor.vel.clamp_length_max(ctx.config.velocity_ceiling);
    }

    let mut mv = actor.vel_xy();
    if mv == DVec2::ZERO {
        return (old_floor_z, Outcome::Continue);
    }

    let start_move = mv;
    let (projected, mut walk_plane) = slope::project(actor, &*world, &ctx.config, mv);
    mv = projected;

    // Take smaller steps when moving faster than the actor's size permits.
    // A step as long as the diameter could land the actor just touching a
    // line without ever cutting through it.
    let mut max_step = actor.radius - 1.0;
    if max_step <= 0.0 {
        max_step = ctx.config.fallback_step;
    }

    let xspeed = mv.x.abs();
    let yspeed = mv.y.abs();
    let mut steps: i32 = 1;
    if xspeed > yspeed {
        if xspeed > max_step {
            steps = (1.0 + xspeed / max_step) as i32;
        }
    } else if yspeed > max_step {
        steps = (1.0 + yspeed / max_step) as i32;
    }

    // The slide response needs the step size derived from the unprojected
    // move, because it re-projects its own clipped steps.
    let mut one_step = start_move / steps as f64;

    let mut start = actor.pos_xy();
    let mut step: i32 = 1;
    let total_steps = steps;

    // Bumped once per tic (not per sub-step) so that push specials re-fire
    // at a rate independent of the mover's size.
    ctx.push_time += 1;

    let mut old_yaw = actor.yaw;

    loop {
        if ctx.compat.has(CompatFlags::WALL_RUN) {
            ctx.push_time += 1;
        }

        let target = start + mv * step as f64 / steps as f64;
        let start_vel = actor.vel_xy();

        match world.attempt_move(actor, target, true, walk_plane.as_ref(), ctx) {
            MoveAttempt::Destroyed => return (old_floor_z, Outcome::Destroyed),
            MoveAttempt::Blocked(blockage) => {
                actor.contacts.actor = blockage.actor;
                actor.contacts.line = blockage.line;

                if blockage.line.is_none() && blockage.actor.is_none() {
                    // Ran into a floor or ceiling mid-sweep. Record the
                    // contact now; the actions run after the sweep, not in
                    // the middle of it.
                    actor.contacts.floor = blockage.floor_sector;
                    actor.contacts.ceiling = blockage.ceiling_sector;
                    actor.contacts.extra_floor = blockage.extra_floor;
                    if world
                        .check_3d_floor_hit(actor, actor.floor_z, false)
                        .is_destroyed()
                    {
                        return (old_floor_z, Outcome::Destroyed);
                    }
                    if world
                        .check_3d_ceiling_hit(actor, actor.ceiling_z, false)
                        .is_destroyed()
                    {
                        return (old_floor_z, Outcome::Destroyed);
                    }
                }

                let bounced = if !actor.is_missile() && actor.bounce == BounceStyle::Mbf {
                    match blockage.actor {
                        Some(other) => world.bounce_off_actor(actor, other),
                        None => world.bounce_off_wall(actor),
                    }
                } else {
                    false
                };

                if bounced {
                    // The bounce already redirected the velocity; keep
                    // sweeping with it.
                } else if actor.can_slide() && !actor.is_missile() {
                    if blockage.actor.is_none() {
                        // Slide along the wall, unless a push special run by
                        // the blocked attempt already changed the velocity.
                        if actor.vel_xy() == start_vel {
                            let wall_run =
                                actor.player.is_some() && ctx.compat.has(CompatFlags::WALL_RUN);
                            if wall_run {
                                // Clip the move at full speed. A second
                                // blocked move this tic slides the full
                                // velocity again, which is the wall-running
                                // exploit this compat mode preserves.
                                world.slide_along_surface(actor, actor.vel_xy(), 1, ctx);
                            } else {
                                world.slide_along_surface(actor, one_step, total_steps, ctx);
                            }
                            if actor.vel_xy() == DVec2::ZERO {
                                steps = 0;
                            } else {
                                if !wall_run {
                                    mv = actor.vel_xy();
                                    one_step = mv / steps as f64;
                                    let (projected, _) =
                                        slope::project(actor, &*world, &ctx.config, mv);
                                    mv = projected;
                                }
                                start = actor.pos_xy() - mv * step as f64 / steps as f64;
                            }
                        } else {
                            steps = 0;
                        }
                    } else {
                        // Slide against another actor: keep whichever axis
                        // still moves freely.
                        let mut t = DVec2::new(0.0, one_step.y);
                        let (projected, plane) = slope::project(actor, &*world, &ctx.config, t);
                        t = projected;
                        walk_plane = plane;
                        let target = actor.pos_xy() + t;
                        match world.attempt_move(actor, target, true, walk_plane.as_ref(), ctx) {
                            MoveAttempt::Destroyed => return (old_floor_z, Outcome::Destroyed),
                            MoveAttempt::Moved => actor.vel.x = 0.0,
                            MoveAttempt::Blocked(_) => {
                                let mut t = DVec2::new(one_step.x, 0.0);
                                let (projected, plane) =
                                    slope::project(actor, &*world, &ctx.config, t);
                                t = projected;
                                walk_plane = plane;
                                let target = actor.pos_xy() + t;
                                match world.attempt_move(
                                    actor,
                                    target,
                                    true,
                                    walk_plane.as_ref(),
                                    ctx,
                                ) {
                                    MoveAttempt::Destroyed => {
                                        return (old_floor_z, Outcome::Destroyed)
                                    }
                                    MoveAttempt::Moved => actor.vel.y = 0.0,
                                    MoveAttempt::Blocked(_) => {
                                        actor.vel.x = 0.0;
                                        actor.vel.y = 0.0;
                                    }
                                }
                            }
                        }
                        steps = 0;
                    }
                } else {
                    // No way to resolve the block: stop dead. Nothing past
                    // this point applies to an actor that went nowhere.
                    actor.vel.x = 0.0;
                    actor.vel.y = 0.0;
                    return (old_floor_z, Outcome::Continue);
                }
            }
            MoveAttempt::Moved => {
                if actor.pos_xy() != target {
                    // Landed somewhere other than the requested spot: the
                    // move crossed a teleporter or portal.
                    if actor.vel.x == 0.0 && actor.vel.y == 0.0 {
                        // Plain teleporter; stop sweeping right here.
                        step = steps;
                    } else {
                        // Line portal or fogless teleporter: the move should
                        // continue. Rotate the displacement by the yaw change
                        // and rebase the sweep so the trajectory stays
                        // continuous.
                        let yaw_delta = actor.yaw - old_yaw;
                        if yaw_delta != 0.0 {
                            mv = DVec2::from_angle(yaw_delta).rotate(mv);
                            old_yaw = actor.yaw;
                        }
                        start = actor.pos_xy() - mv * step as f64 / steps as f64;
                    }
                }
            }
        }

        step += 1;
        if step > steps {
            break;
        }
    }

    // Airborne actors keep their momentum.
    if actor.pos.z > actor.floor_z
        && !actor.flags.has(ActorFlags::ON_ACTOR)
        && !actor.flags.has(ActorFlags::NOCLIP2)
        && (!actor.flags.has(ActorFlags::FLY) || !actor.flags.has(ActorFlags::NOGRAVITY))
        && actor.water_level == WaterLevel::None
    {
        return (old_floor_z, Outcome::Continue);
    }

    if actor.flags.has(ActorFlags::CORPSE) || actor.flags.has(ActorFlags::FALLING) {
        // A body halfway off a step keeps sliding while it still has some
        // speed and hangs above its sector's raw floor for a reason other
        // than a drop-off. The exception: if no existing solid stacked floor
        // tops out exactly at the cached floor height, the surface that held
        // the body up is gone, and friction must apply or it slides forever.
        if actor.vel.x.abs() > ctx.config.corpse_slide_min
            || actor.vel.y.abs() > ctx.config.corpse_slide_min
        {
            let sector = world.sector(actor.sector);
            if actor.floor_z > sector.floor.z_at(actor.pos_xy())
                && actor.dropoff_z != actor.floor_z
            {
                let on_stacked = sector.extra_floors.iter().any(|rover| {
                    rover.flags.has(ExtraFloorFlags::EXISTS)
                        && rover.flags.has(ExtraFloorFlags::SOLID)
                        && rover.top.z_at(actor.pos_xy()) == actor.floor_z
                });
                if on_stacked {
                    return (old_floor_z, Outcome::Continue);
                }
            }
        }
    }

    let friction = world.ground_friction(actor);
    actor.vel.x *= friction;
    actor.vel.y *= friction;

    (old_floor_z, Outcome::Continue)
}
