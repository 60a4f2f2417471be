//! Torpedo Arena headless runner
//!
//! Plays a full round without a renderer: a simple autopilot stands in for
//! the human player, driving the same capability surface (steer, tap to
//! fire) the browser input layer uses. Useful for balance tuning and as a
//! living example of the sim API.
//!
//! Usage: torpedo-arena [seed] [config.json]

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::path::Path;

use torpedo_arena::config::Config;
use torpedo_arena::consts::SIM_DT;
use torpedo_arena::sim::{
    GameEvent, GameInterface, GamePhase, Obstacle, ShipId, StaticObstacles, TickInput, World,
    intercept_point, tick,
};
use torpedo_arena::secs_to_ticks;

/// How many asteroids the demo scatters around the arena
const ASTEROID_COUNT: usize = 40;

/// Give up if a round somehow drags past this much simulated time
const MAX_ROUND_SECS: f32 = 600.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xA57E201D);
    let config = match args.next() {
        Some(path) => Config::load(Path::new(&path)),
        None => Config::default(),
    };

    log::info!(
        "Seed {seed}, {} robots, difficulty {}",
        config.enemy_ship_count,
        config.difficulty.as_str()
    );

    let obstacles = scatter_asteroids(&config, seed);
    let mut world = World::new(config, seed);

    let max_ticks = (MAX_ROUND_SECS / SIM_DT) as u64;
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };

    while !matches!(world.phase, GamePhase::GameOver { .. }) && world.tick_count < max_ticks {
        autopilot(&mut world, &mut input);
        tick(&mut world, &obstacles, &input);
        input = TickInput::default();

        for event in world.drain_events() {
            if let GameEvent::ShipDestroyed { ship, position } = event {
                log::info!("{ship:?} destroyed at {position}");
            }
        }
    }

    let elapsed = world.tick_count as f32 * SIM_DT;
    match world.phase {
        GamePhase::GameOver { victory: true } => {
            println!("Victory after {elapsed:.1}s ({} lives left)", world.lives)
        }
        GamePhase::GameOver { victory: false } => println!("Defeat after {elapsed:.1}s"),
        _ => println!("Round still running after {elapsed:.1}s, giving up"),
    }
}

/// Stand-in player: every few seconds steer toward the nearest robot, and
/// periodically fire a led shot at it through the same interface the touch
/// glue uses.
fn autopilot(world: &mut World, input: &mut TickInput) {
    let steer_period = secs_to_ticks(3.0);
    let fire_period = secs_to_ticks(2.0);
    let now = world.tick_count;

    let player = world.player();
    if !player.alive {
        return;
    }
    let from = player.position;
    let torpedo_speed = world.config.torpedo_speed;

    let nearest = world
        .ships
        .iter()
        .filter(|s| s.alive && !s.id.is_player())
        .min_by(|a, b| {
            let da = a.position.distance_squared(from);
            let db = b.position.distance_squared(from);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| (s.id, s.position, s.velocity));

    let Some((_, position, velocity)) = nearest else {
        return;
    };

    if now % steer_period == 0 {
        input.swipe = Some((from, position));
    }
    if now % fire_period == 0 {
        let aim = intercept_point(from, position, velocity, torpedo_speed);
        world.launch_torpedo(ShipId::PLAYER, aim);
    }
}

/// Scatter random asteroids, keeping the spawn area around the center clear
fn scatter_asteroids(config: &Config, seed: u64) -> StaticObstacles {
    let mut rng = Pcg32::seed_from_u64(seed ^ 0x5EED);
    let center = config.center();
    let mut asteroids = Vec::with_capacity(ASTEROID_COUNT);

    while asteroids.len() < ASTEROID_COUNT {
        let position = Vec2::new(
            rng.random_range(0.0..config.boundary_width),
            rng.random_range(0.0..config.boundary_height),
        );
        if position.distance(center) < 600.0 {
            continue;
        }
        asteroids.push(Obstacle {
            center: position,
            radius: rng.random_range(10.0..50.0),
        });
    }
    StaticObstacles::new(asteroids)
}
