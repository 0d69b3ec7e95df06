//! Scriptable [`GameWorld`] double shared by the motion tests.
//!
//! Geometry is reduced to axis-aligned scripts (a wall past some x, a
//! blocking actor past some x, a teleporter on the nth attempt) and every
//! hook records that it was called, so tests can assert on both the motion
//! result and the exact sequence of world interactions.

use std::cell::Cell;

use glam::{DVec2, DVec3};

use crate::actor::{Actor, ActorId, DamageKind};
use crate::motion::TickContext;
use crate::world::{
    Blockage, GameWorld, LineId, MoveAttempt, Outcome, Plane, Ride, Sector, SectorAction, SectorId,
    DEFAULT_FRICTION,
};

/// Scripted teleporter: the nth move attempt relocates the actor instead of
/// moving it to its target.
#[derive(Debug, Clone, Copy)]
pub struct Teleport {
    pub on_attempt: u32,
    pub to: DVec3,
    pub yaw_delta: f64,
    /// A discrete teleporter zeroes the mover's velocity; a line portal
    /// keeps it.
    pub zero_velocity: bool,
}

pub struct TestWorld {
    pub sectors: Vec<Sector>,

    // scripts
    pub floor_plane: Option<Plane>,
    pub wall_x: Option<f64>,
    pub actor_wall_x: Option<f64>,
    pub floor_block: Option<SectorId>,
    pub ceiling_block: Option<SectorId>,
    pub destroy_on_attempt: Option<u32>,
    pub teleport: Option<Teleport>,
    pub blocked_velocity_change: Option<DVec2>,
    pub slide_result: Option<DVec2>,
    pub bounce_result: Option<DVec2>,
    pub friction: f64,
    pub ride: Option<Ride>,
    pub frozen: bool,
    pub no_delay_frees: bool,
    pub advance_frees: bool,
    pub destroy_on_crash: bool,
    pub destroy_on_item_effects: bool,
    pub destroy_on_sector_action: bool,
    pub floor_action_teleport_z: Option<f64>,

    // call records
    pub attempts: u32,
    pub attempt_targets: Vec<DVec2>,
    pub slides: Vec<(DVec2, i32)>,
    pub bounces: u32,
    pub friction_queries: Cell<u32>,
    pub sector_actions: Vec<(SectorId, SectorAction)>,
    pub floor_hits: Vec<(f64, bool)>,
    pub ceiling_hits: Vec<(f64, bool)>,
    pub floor_impacts: u32,
    pub fall_damages: u32,
    pub damage_calls: Vec<(i32, DamageKind)>,
    pub crashes: u32,
    pub bump_activations: Vec<ActorId>,
    pub item_effect_calls: u32,
    pub unlinks: u32,
    pub links: u32,
    pub portal_checks: Vec<bool>,
    pub water_updates: u32,
    pub floor_clip_adjusts: u32,
    pub fake_floor_checks: Vec<f64>,
    pub render_refreshes: u32,
    pub no_delay_checks: u32,
    pub state_advances: u32,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            sectors: vec![Sector::open(0.0, 128.0)],
            floor_plane: None,
            wall_x: None,
            actor_wall_x: None,
            floor_block: None,
            ceiling_block: None,
            destroy_on_attempt: None,
            teleport: None,
            blocked_velocity_change: None,
            slide_result: None,
            bounce_result: None,
            friction: DEFAULT_FRICTION,
            ride: None,
            frozen: false,
            no_delay_frees: false,
            advance_frees: false,
            destroy_on_crash: false,
            destroy_on_item_effects: false,
            destroy_on_sector_action: false,
            floor_action_teleport_z: None,
            attempts: 0,
            attempt_targets: Vec::new(),
            slides: Vec::new(),
            bounces: 0,
            friction_queries: Cell::new(0),
            sector_actions: Vec::new(),
            floor_hits: Vec::new(),
            ceiling_hits: Vec::new(),
            floor_impacts: 0,
            fall_damages: 0,
            damage_calls: Vec::new(),
            crashes: 0,
            bump_activations: Vec::new(),
            item_effect_calls: 0,
            unlinks: 0,
            links: 0,
            portal_checks: Vec::new(),
            water_updates: 0,
            floor_clip_adjusts: 0,
            fake_floor_checks: Vec::new(),
            render_refreshes: 0,
            no_delay_checks: 0,
            state_advances: 0,
        }
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_bounce(&mut self, actor: &mut Actor) -> bool {
        match self.bounce_result {
            Some(vel) => {
                self.bounces += 1;
                actor.vel.x = vel.x;
                actor.vel.y = vel.y;
                true
            }
            None => false,
        }
    }
}

impl GameWorld for TestWorld {
    fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id.0 as usize]
    }

    fn attempt_move(
        &mut self,
        actor: &mut Actor,
        target: DVec2,
        _allow_dropoff: bool,
        _walk_plane: Option<&Plane>,
        _ctx: &TickContext,
    ) -> MoveAttempt {
        self.attempts += 1;
        self.attempt_targets.push(target);

        if let Some(n) = self.destroy_on_attempt {
            if self.attempts == n {
                return MoveAttempt::Destroyed;
            }
        }
        if let Some(teleport) = self.teleport {
            if self.attempts == teleport.on_attempt {
                actor.pos = teleport.to;
                actor.yaw += teleport.yaw_delta;
                if teleport.zero_velocity {
                    actor.vel = DVec3::ZERO;
                }
                return MoveAttempt::Moved;
            }
        }

        let blocked = |blockage: Blockage, actor: &mut Actor| {
            if let Some(vel) = self.blocked_velocity_change {
                actor.vel.x = vel.x;
                actor.vel.y = vel.y;
            }
            MoveAttempt::Blocked(blockage)
        };

        if let Some(wall) = self.wall_x {
            if target.x > wall {
                return blocked(
                    Blockage {
                        line: Some(LineId(1)),
                        ..Default::default()
                    },
                    actor,
                );
            }
        }
        if let Some(wall) = self.actor_wall_x {
            if target.x > wall {
                return blocked(
                    Blockage {
                        actor: Some(ActorId(99)),
                        ..Default::default()
                    },
                    actor,
                );
            }
        }
        if self.floor_block.is_some() || self.ceiling_block.is_some() {
            return blocked(
                Blockage {
                    floor_sector: self.floor_block,
                    ceiling_sector: self.ceiling_block,
                    ..Default::default()
                },
                actor,
            );
        }

        actor.pos.x = target.x;
        actor.pos.y = target.y;
        MoveAttempt::Moved
    }

    fn find_floor_plane(&self, sector: SectorId, _pos: DVec3) -> Plane {
        self.floor_plane.unwrap_or(self.sector(sector).floor)
    }

    fn check_resting_on_actor(&self, _actor: &Actor) -> Option<Ride> {
        self.ride
    }

    fn bounce_off_actor(&mut self, actor: &mut Actor, _other: ActorId) -> bool {
        self.apply_bounce(actor)
    }

    fn bounce_off_wall(&mut self, actor: &mut Actor) -> bool {
        self.apply_bounce(actor)
    }

    fn slide_along_surface(
        &mut self,
        actor: &mut Actor,
        delta: DVec2,
        steps: i32,
        _ctx: &TickContext,
    ) {
        self.slides.push((delta, steps));
        if let Some(vel) = self.slide_result {
            actor.vel.x = vel.x;
            actor.vel.y = vel.y;
        }
    }

    fn ground_friction(&self, _actor: &Actor) -> f64 {
        self.friction_queries.set(self.friction_queries.get() + 1);
        self.friction
    }

    fn trigger_sector_action(
        &mut self,
        actor: &mut Actor,
        sector: SectorId,
        action: SectorAction,
    ) -> Outcome {
        self.sector_actions.push((sector, action));
        if action == SectorAction::HitFloor {
            if let Some(z) = self.floor_action_teleport_z {
                actor.pos.z = z;
            }
        }
        if self.destroy_on_sector_action {
            Outcome::Destroyed
        } else {
            Outcome::Continue
        }
    }

    fn check_3d_floor_hit(&mut self, _actor: &mut Actor, z: f64, finalize: bool) -> Outcome {
        self.floor_hits.push((z, finalize));
        Outcome::Continue
    }

    fn check_3d_ceiling_hit(&mut self, _actor: &mut Actor, z: f64, finalize: bool) -> Outcome {
        self.ceiling_hits.push((z, finalize));
        Outcome::Continue
    }

    fn floor_impact(&mut self, _actor: &mut Actor) -> Outcome {
        self.floor_impacts += 1;
        Outcome::Continue
    }

    fn fall_damage(&mut self, _actor: &mut Actor) -> Outcome {
        self.fall_damages += 1;
        Outcome::Continue
    }

    fn apply_damage(&mut self, _actor: &mut Actor, amount: i32, kind: DamageKind) -> Outcome {
        self.damage_calls.push((amount, kind));
        Outcome::Continue
    }

    fn crash_landing(&mut self, _actor: &mut Actor) -> Outcome {
        self.crashes += 1;
        if self.destroy_on_crash {
            Outcome::Destroyed
        } else {
            Outcome::Continue
        }
    }

    fn activate_bump_special(&mut self, target: ActorId, _actor: &mut Actor) -> bool {
        self.bump_activations.push(target);
        true
    }

    fn item_effects(&mut self, _actor: &mut Actor) -> Outcome {
        self.item_effect_calls += 1;
        if self.destroy_on_item_effects {
            Outcome::Destroyed
        } else {
            Outcome::Continue
        }
    }

    fn unlink(&mut self, _actor: &mut Actor) {
        self.unlinks += 1;
    }

    fn link(&mut self, _actor: &mut Actor) {
        self.links += 1;
    }

    fn check_portal_transition(&mut self, _actor: &mut Actor, moved: bool) {
        self.portal_checks.push(moved);
    }

    fn update_water_level(&mut self, _actor: &mut Actor) {
        self.water_updates += 1;
    }

    fn adjust_floor_clip(&mut self, _actor: &mut Actor) {
        self.floor_clip_adjusts += 1;
    }

    fn check_fake_floor_triggers(&mut self, _actor: &mut Actor, old_z: f64) {
        self.fake_floor_checks.push(old_z);
    }

    fn refresh_render_linkage(&mut self, _actor: &mut Actor) {
        self.render_refreshes += 1;
    }

    fn is_frozen(&self, _actor: &Actor) -> bool {
        self.frozen
    }

    fn check_no_delay(&mut self, _actor: &mut Actor) -> bool {
        self.no_delay_checks += 1;
        !self.no_delay_frees
    }

    fn advance_state(&mut self, _actor: &mut Actor) -> bool {
        self.state_advances += 1;
        !self.advance_frees
    }
}
