//! World state and core entity types
//!
//! The [`World`] owns every piece of mutable game state - ships, torpedoes,
//! explosions, the event scheduler and the seeded RNG - and is only ever
//! touched from the single simulation thread.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ai::RobotBrain;
use super::scheduler::{Event, Scheduler};
use super::ship::{Ship, ShipId};
use crate::config::{Config, Difficulty};
use crate::consts::*;
use crate::{polar_to_cartesian, secs_to_ticks};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first tap; physics paused
    BeforeStart,
    /// Active gameplay
    Running,
    /// Round ended
    GameOver { victory: bool },
}

/// Things that happened during a tick, drained by the rendering/audio glue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    TorpedoLaunched { owner: ShipId, target: Vec2 },
    TorpedoDetonated { position: Vec2 },
    ShipDestroyed { ship: ShipId, position: Vec2 },
    PlayerRespawned { position: Vec2 },
    GameOver { victory: bool },
}

/// A torpedo in flight. Flies in a straight line at constant speed toward
/// the aim point fixed at launch.
#[derive(Debug, Clone)]
pub struct Torpedo {
    pub id: u32,
    pub position: Vec2,
    /// Intercept aim point computed at launch; never changes
    pub target: Vec2,
    pub owner: ShipId,
    pub launch_tick: u64,
}

impl Torpedo {
    /// Current velocity, reconstructed from the fixed heading. Defensive AI
    /// performs exactly this reconstruction to predict inbound torpedoes.
    pub fn velocity(&self, torpedo_speed: f32) -> Vec2 {
        (self.target - self.position).normalize_or_zero() * torpedo_speed
    }
}

/// An explosion left behind by a detonated torpedo. Position and radius are
/// fixed; it damages everything inside the blast radius each tick until it
/// fades.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub position: Vec2,
    pub remaining_ticks: u64,
}

/// Capability surface the core hands to the AI and input collaborators:
/// fire control plus read access to the player, the live torpedo set and
/// the difficulty setting.
pub trait GameInterface {
    fn launch_torpedo(&mut self, ship: ShipId, target: Vec2);
    fn player(&self) -> &Ship;
    fn torpedoes(&self) -> &[Torpedo];
    fn difficulty(&self) -> Difficulty;
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: Config,
    /// Run seed, kept for restarts and bug reports
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub tick_count: u64,
    /// Player lives remaining (a death with lives left schedules a respawn)
    pub lives: u8,
    /// Player first, then robots, in id order
    pub ships: Vec<Ship>,
    /// One brain per robot ship
    pub brains: Vec<RobotBrain>,
    /// Active torpedoes in launch order
    pub torpedoes: Vec<Torpedo>,
    pub explosions: Vec<Explosion>,
    pub scheduler: Scheduler,
    /// Events produced this tick, drained by the caller
    pub events: Vec<GameEvent>,
    next_torpedo_id: u32,
}

impl World {
    /// Create a fresh world: player at the arena center, robots arranged on
    /// a circle around it. Physics stays paused until [`World::start`].
    pub fn new(config: Config, seed: u64) -> Self {
        let center = config.center();
        let mut ships = vec![Ship::new(ShipId::PLAYER, center, config.torpedo_bays)];
        let mut brains = Vec::new();

        let count = config.enemy_ship_count.max(1);
        let angle_step = std::f32::consts::TAU / count as f32;
        for i in 0..count {
            let id = ShipId(i + 1);
            let position = center + polar_to_cartesian(SPAWN_RADIUS, angle_step * i as f32);
            ships.push(Ship::new(id, position, config.torpedo_bays));
            brains.push(RobotBrain::new(id));
        }

        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::BeforeStart,
            tick_count: 0,
            lives: PLAYER_LIVES,
            ships,
            brains,
            torpedoes: Vec::new(),
            explosions: Vec::new(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            next_torpedo_id: 1,
        }
    }

    /// Begin the round: unpause physics and arm every robot brain
    pub fn start(&mut self) {
        if self.phase != GamePhase::BeforeStart {
            return;
        }
        self.phase = GamePhase::Running;
        let now = self.tick_count;
        let config = &self.config;
        for brain in &mut self.brains {
            brain.arm(now, config, &mut self.rng);
        }
        log::info!(
            "Round started: {} robots, difficulty {}",
            self.brains.len(),
            self.config.difficulty.as_str()
        );
    }

    /// Tear the round down and rebuild from a new seed, dropping every
    /// outstanding timer and entity. Leaked callbacks from the previous
    /// round must not leak into the next one.
    pub fn restart(&mut self, seed: u64) {
        self.scheduler.clear();
        *self = World::new(self.config.clone(), seed);
    }

    pub fn ship(&self, id: ShipId) -> &Ship {
        &self.ships[id.0 as usize]
    }

    pub fn ship_mut(&mut self, id: ShipId) -> &mut Ship {
        &mut self.ships[id.0 as usize]
    }

    /// Robot ships (everything but the player)
    pub fn robots(&self) -> &[Ship] {
        &self.ships[1..]
    }

    pub fn alive_robot_count(&self) -> usize {
        self.robots().iter().filter(|s| s.alive).count()
    }

    pub(crate) fn next_torpedo_id(&mut self) -> u32 {
        let id = self.next_torpedo_id;
        self.next_torpedo_id += 1;
        id
    }

    /// Fire a torpedo from `ship` at a world-space target point.
    ///
    /// Silently does nothing when the ship is dead or has no loaded bay -
    /// an empty rack is a rate limit, not an error. A successful launch
    /// consumes a bay and schedules its reload, plus a flight timeout that
    /// detonates the torpedo mid-air if it never arrives.
    pub fn fire_torpedo(&mut self, ship_id: ShipId, target: Vec2) {
        if self.phase != GamePhase::Running {
            return;
        }
        let now = self.tick_count;
        let reload_ticks = secs_to_ticks(self.config.torpedo_reload_time);

        let ship = &mut self.ships[ship_id.0 as usize];
        if !ship.alive {
            return;
        }
        if ship.ready_bays == 0 {
            log::debug!("{:?} launch suppressed: no ready bays", ship_id);
            return;
        }
        ship.ready_bays -= 1;
        let generation = ship.generation;
        let position = ship.position;

        self.scheduler.schedule(
            now,
            reload_ticks,
            Event::ReloadBay {
                ship: ship_id,
                generation,
            },
        );

        let id = self.next_torpedo_id();
        self.torpedoes.push(Torpedo {
            id,
            position,
            target,
            owner: ship_id,
            launch_tick: now,
        });
        self.scheduler.schedule(
            now,
            secs_to_ticks(TORPEDO_TIMEOUT_SECS),
            Event::TorpedoTimeout { torpedo: id },
        );

        self.events.push(GameEvent::TorpedoLaunched {
            owner: ship_id,
            target,
        });
        log::debug!("{:?} fired torpedo {} at {}", ship_id, id, target);
    }

    /// Detonate the torpedo with the given id: remove it and leave an
    /// explosion at its final position. A no-op if the torpedo already
    /// detonated (stale flight timeout).
    pub(crate) fn detonate_torpedo(&mut self, id: u32) {
        let Some(index) = self.torpedoes.iter().position(|t| t.id == id) else {
            return;
        };
        // Vec::remove keeps the remaining torpedoes in launch order
        let torpedo = self.torpedoes.remove(index);
        self.explosions.push(Explosion {
            position: torpedo.position,
            remaining_ticks: secs_to_ticks(self.config.torpedo_blast_time),
        });
        self.events.push(GameEvent::TorpedoDetonated {
            position: torpedo.position,
        });
        log::debug!("Torpedo {} detonated at {}", torpedo.id, torpedo.position);
    }

    /// Take this tick's event list, leaving it empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl GameInterface for World {
    fn launch_torpedo(&mut self, ship: ShipId, target: Vec2) {
        self.fire_torpedo(ship, target);
    }

    fn player(&self) -> &Ship {
        &self.ships[0]
    }

    fn torpedoes(&self) -> &[Torpedo] {
        &self.torpedoes
    }

    fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }
}
