//! Fixed timestep simulation tick
//!
//! One call advances the whole world a single step, in a fixed order:
//! scheduled events (reloads, flight timeouts, respawn) drain first, then
//! player input, the AI pass, the motion pass, and finally torpedo
//! termination and explosion damage. Within a tick every torpedo
//! termination resolves before any ship damage is evaluated, and a brand
//! new explosion only starts hurting ships on the following tick.

use glam::Vec2;

use super::ai::AiCommand;
use super::scheduler::Event;
use super::ship::ShipId;
use super::spatial::{Aabb, ObstacleIndex};
use super::state::{GameEvent, GamePhase, World};
use crate::consts::*;
use crate::{polar_to_cartesian, secs_to_ticks};

/// Half-extent of the box handed to the spatial index around a torpedo
const TORPEDO_QUERY_RADIUS: f32 = 10.0;

/// Input commands for a single tick, already translated from raw pointer
/// gestures by the platform layer
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Begin the round (first tap on the start screen)
    pub start: bool,
    /// Tap at a world-space point: fire a torpedo there
    pub tap: Option<Vec2>,
    /// Swipe from/to: point the player ship along the swipe at full speed
    pub swipe: Option<(Vec2, Vec2)>,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, obstacles: &dyn ObstacleIndex, input: &TickInput) {
    if input.start {
        world.start();
    }
    if world.phase != GamePhase::Running {
        return;
    }

    world.tick_count += 1;
    let now = world.tick_count;

    // Scheduled callbacks fire before the update pass
    while let Some(event) = world.scheduler.pop_due(now) {
        handle_event(world, event);
    }

    apply_player_input(world, input);
    ai_pass(world);
    motion_pass(world);
    torpedo_pass(world, obstacles);
    resolve_round(world);
}

/// Run a due scheduler event. Every payload is guarded so events aimed at a
/// previous life, or at an entity that no longer exists, do nothing.
fn handle_event(world: &mut World, event: Event) {
    match event {
        Event::ReloadBay { ship, generation } => {
            let max_bays = world.config.torpedo_bays;
            let ship = world.ship_mut(ship);
            if ship.alive && ship.generation == generation {
                ship.ready_bays = (ship.ready_bays + 1).min(max_bays);
            }
        }
        Event::TorpedoTimeout { torpedo } => {
            // Self-detonate a torpedo that never arrived
            world.detonate_torpedo(torpedo);
        }
        Event::RespawnPlayer => {
            let center = world.config.center();
            let bays = world.config.torpedo_bays;
            let player = world.ship_mut(ShipId::PLAYER);
            if !player.alive {
                player.respawn(center, bays);
                world.events.push(GameEvent::PlayerRespawned { position: center });
                log::info!("Player respawned at {center}");
            }
        }
    }
}

/// Translate this tick's gestures into player ship commands
fn apply_player_input(world: &mut World, input: &TickInput) {
    if let Some(target) = input.tap {
        world.fire_torpedo(ShipId::PLAYER, target);
    }

    if let Some((from, to)) = input.swipe {
        let max_velocity = world.config.max_ship_velocity;
        let player = world.ship_mut(ShipId::PLAYER);
        let delta = to - from;
        if player.alive && delta.length_squared() > 0.0 {
            let heading = delta.y.atan2(delta.x);
            player.desired_rotation = heading;
            let velocity = polar_to_cartesian(max_velocity, heading);
            player.set_desired_velocity(velocity, max_velocity);
        }
    }
}

/// Let every robot whose behavior timers are due make its decisions, then
/// apply them. Decisions are collected first so the scan never observes a
/// half-applied tick.
fn ai_pass(world: &mut World) {
    let now = world.tick_count;
    let mut commands: Vec<AiCommand> = Vec::new();

    for brain in &mut world.brains {
        let ship = &world.ships[brain.ship.0 as usize];
        let player = &world.ships[0];
        brain.think(
            ship,
            player,
            &world.torpedoes,
            &world.config,
            now,
            &mut world.rng,
            &mut commands,
        );
    }

    let max_velocity = world.config.max_ship_velocity;
    for command in commands {
        match command {
            AiCommand::SetCourse {
                ship,
                rotation,
                velocity,
            } => {
                let ship = world.ship_mut(ship);
                if ship.alive {
                    ship.desired_rotation = rotation;
                    ship.set_desired_velocity(velocity, max_velocity);
                }
            }
            AiCommand::Launch { ship, target } => world.fire_torpedo(ship, target),
        }
    }
}

/// Smooth every live ship toward its desired state and integrate positions.
/// Torpedoes fly at constant speed toward their fixed aim point.
fn motion_pass(world: &mut World) {
    let turn_rate = world.config.ship_turn_rate;
    let acceleration_rate = world.config.ship_acceleration_rate;
    let max_velocity = world.config.max_ship_velocity;
    let bounds = Vec2::new(world.config.boundary_width, world.config.boundary_height);
    let torpedo_speed = world.config.torpedo_speed;

    for ship in &mut world.ships {
        if !ship.alive {
            continue;
        }
        ship.advance(turn_rate, acceleration_rate, max_velocity);
        ship.position = (ship.position + ship.velocity * SIM_DT).clamp(Vec2::ZERO, bounds);
    }

    for torpedo in &mut world.torpedoes {
        let velocity = torpedo.velocity(torpedo_speed);
        torpedo.position += velocity * SIM_DT;
    }
}

/// Torpedo terminations, then explosion damage, then explosion expiry.
///
/// Both the torpedo-vs-explosion check and the damage pass run against the
/// set of explosions that existed when this pass began, so an explosion
/// spawned this tick catches nothing until the next one.
fn torpedo_pass(world: &mut World, obstacles: &dyn ObstacleIndex) {
    let radius = world.config.explosion_radius;
    let radius_sq = radius * radius;
    let blast_zones: Vec<Vec2> = world.explosions.iter().map(|e| e.position).collect();

    // Termination scan collects ids first; removal happens after, so the
    // torpedo list is never mutated mid-iteration
    let mut detonations: Vec<u32> = Vec::new();
    for torpedo in &world.torpedoes {
        let arrived = torpedo.position.distance(torpedo.target) < ARRIVAL_EPSILON;
        let caught = blast_zones
            .iter()
            .any(|&zone| zone.distance(torpedo.position) < radius);
        let grounded = obstacles
            .query(Aabb::around(torpedo.position, TORPEDO_QUERY_RADIUS))
            .iter()
            .any(|o| o.contains(torpedo.position));
        if arrived || caught || grounded {
            detonations.push(torpedo.id);
        }
    }
    for id in detonations {
        world.detonate_torpedo(id);
    }

    // Damage pass: every live ship inside a pre-existing blast dies. No
    // friendly-fire exclusion - your own torpedo will kill you.
    let mut player_died = false;
    for ship in &mut world.ships {
        if !ship.alive {
            continue;
        }
        let hit = blast_zones
            .iter()
            .any(|&zone| zone.distance_squared(ship.position) < radius_sq);
        if hit {
            ship.destroy();
            player_died |= ship.id.is_player();
            world.events.push(GameEvent::ShipDestroyed {
                ship: ship.id,
                position: ship.position,
            });
            log::info!("{:?} destroyed", ship.id);
        }
    }

    if player_died {
        world.lives = world.lives.saturating_sub(1);
        if world.lives > 0 {
            let delay = secs_to_ticks(world.config.respawn_time);
            world
                .scheduler
                .schedule(world.tick_count, delay, Event::RespawnPlayer);
            log::info!("Player down, {} lives left", world.lives);
        }
    }

    for explosion in &mut world.explosions {
        explosion.remaining_ticks = explosion.remaining_ticks.saturating_sub(1);
    }
    world.explosions.retain(|e| e.remaining_ticks > 0);
}

/// Decide win/loss. Defeat (player dead with no lives left) takes priority
/// over a simultaneous victory.
fn resolve_round(world: &mut World) {
    let player_out = !world.ships[0].alive && world.lives == 0;
    let robots_out = world.alive_robot_count() == 0;
    if !player_out && !robots_out {
        return;
    }

    let victory = !player_out;
    world.phase = GamePhase::GameOver { victory };
    world.scheduler.clear();
    world.events.push(GameEvent::GameOver { victory });
    log::info!(
        "Game over after {} ticks: {}",
        world.tick_count,
        if victory { "victory" } else { "defeat" }
    );
}
