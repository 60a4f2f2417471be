//! Robot ship AI
//!
//! Each robot runs three independent periodic behaviors - wandering course
//! changes, offensive fire at the player, and defensive fire against inbound
//! torpedoes. There is no state machine; each behavior just has its own next
//! due tick, re-armed with a little random jitter so the robots stay
//! desynchronized. Decisions are emitted as commands and applied after the
//! whole AI pass, never mid-scan.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::intercept::{intercept_point, is_closing};
use super::ship::{Ship, ShipId};
use super::state::Torpedo;
use crate::config::Config;
use crate::consts::*;
use crate::{polar_to_cartesian, secs_to_ticks};

/// A decision a robot made this tick, applied by the tick function
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiCommand {
    /// Steer: new desired rotation and velocity for the ship
    SetCourse {
        ship: ShipId,
        rotation: f32,
        velocity: Vec2,
    },
    /// Fire a torpedo at a world-space point
    Launch { ship: ShipId, target: Vec2 },
}

/// Per-robot behavior timers. Created unarmed; [`RobotBrain::arm`] schedules
/// the first round of decisions when the round starts.
#[derive(Debug, Clone)]
pub struct RobotBrain {
    pub ship: ShipId,
    next_course: u64,
    next_fire: u64,
    next_defensive: u64,
}

impl RobotBrain {
    pub fn new(ship: ShipId) -> Self {
        Self {
            ship,
            next_course: u64::MAX,
            next_fire: u64::MAX,
            next_defensive: u64::MAX,
        }
    }

    /// Arm the behavior timers at round start. The first course change fires
    /// on the very next think pass so robots scatter immediately.
    pub fn arm(&mut self, now: u64, config: &Config, rng: &mut Pcg32) {
        self.next_course = now;
        self.next_fire = now + jittered_interval(FIRE_INTERVAL_SECS, config, rng);
        self.next_defensive = now + fixed_interval(DEFENSIVE_INTERVAL_SECS, config);
    }

    /// Run every behavior whose due tick has arrived. Dead robots decide
    /// nothing - destruction disarms the brain.
    pub fn think(
        &mut self,
        ship: &Ship,
        player: &Ship,
        torpedoes: &[Torpedo],
        config: &Config,
        now: u64,
        rng: &mut Pcg32,
        out: &mut Vec<AiCommand>,
    ) {
        if !ship.alive {
            return;
        }

        if now >= self.next_course {
            self.change_course(ship, player, config, rng, out);
            self.next_course = now + jittered_interval(COURSE_INTERVAL_SECS, config, rng);
        }

        if now >= self.next_fire {
            self.fire_at_player(ship, player, config, rng, out);
            self.next_fire = now + jittered_interval(FIRE_INTERVAL_SECS, config, rng);
        }

        if now >= self.next_defensive {
            self.fire_defensive(ship, torpedoes, config, out);
            self.next_defensive = now + fixed_interval(DEFENSIVE_INTERVAL_SECS, config);
        }
    }

    /// Far from the player: close in, fanned out within a cone so the pack
    /// doesn't collapse onto one line. Near the player: wander on a random
    /// heading at half-to-full speed.
    fn change_course(
        &self,
        ship: &Ship,
        player: &Ship,
        config: &Config,
        rng: &mut Pcg32,
        out: &mut Vec<AiCommand>,
    ) {
        let to_player = player.position - ship.position;
        if to_player.length_squared() > PURSUE_DISTANCE_SQ {
            let heading =
                to_player.y.atan2(to_player.x) + rng.random_range(-PURSUE_CONE..PURSUE_CONE);
            out.push(AiCommand::SetCourse {
                ship: self.ship,
                rotation: heading,
                velocity: polar_to_cartesian(config.max_ship_velocity, heading),
            });
            return;
        }

        let heading = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(config.max_ship_velocity / 2.0..config.max_ship_velocity);
        out.push(AiCommand::SetCourse {
            ship: self.ship,
            rotation: heading,
            velocity: polar_to_cartesian(speed, heading),
        });
    }

    /// Lead the player with the intercept solver. Easy difficulty smears the
    /// aim point with random slack.
    fn fire_at_player(
        &self,
        ship: &Ship,
        player: &Ship,
        config: &Config,
        rng: &mut Pcg32,
        out: &mut Vec<AiCommand>,
    ) {
        if !player.alive {
            return;
        }

        let mut target = intercept_point(
            ship.position,
            player.position,
            player.velocity,
            config.torpedo_speed,
        );
        let slack = config.difficulty.aim_slack();
        if slack > 0.0 {
            target.x += rng.random_range(-slack..slack);
            target.y += rng.random_range(-slack..slack);
        }
        out.push(AiCommand::Launch {
            ship: self.ship,
            target,
        });
    }

    /// Scan live torpedoes in launch order and shoot down the first one that
    /// is both inside the reaction band and actually closing. At most one
    /// defensive shot per pass.
    fn fire_defensive(
        &self,
        ship: &Ship,
        torpedoes: &[Torpedo],
        config: &Config,
        out: &mut Vec<AiCommand>,
    ) {
        for torpedo in torpedoes {
            let dist_sq = ship.position.distance_squared(torpedo.position);
            if !(DEFENSIVE_NEAR_SQ..=DEFENSIVE_FAR_SQ).contains(&dist_sq) {
                continue;
            }

            let torpedo_velocity = torpedo.velocity(config.torpedo_speed);
            let relative_position = torpedo.position - ship.position;
            let relative_velocity = torpedo_velocity - ship.velocity;
            if is_closing(relative_position, relative_velocity) {
                let target = intercept_point(
                    ship.position,
                    torpedo.position,
                    torpedo_velocity,
                    config.torpedo_speed,
                );
                out.push(AiCommand::Launch {
                    ship: self.ship,
                    target,
                });
                return;
            }
        }
    }
}

/// Difficulty-scaled interval with +/- jitter, in ticks
fn jittered_interval(base_secs: f32, config: &Config, rng: &mut Pcg32) -> u64 {
    let scaled = base_secs * config.difficulty.interval_multiplier();
    secs_to_ticks(scaled + rng.random_range(-INTERVAL_JITTER_SECS..INTERVAL_JITTER_SECS)).max(1)
}

/// Difficulty-scaled interval without jitter, in ticks
fn fixed_interval(base_secs: f32, config: &Config) -> u64 {
    secs_to_ticks(base_secs * config.difficulty.interval_multiplier()).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use rand::SeedableRng;

    fn setup() -> (Config, Pcg32) {
        let config = Config {
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        (config, Pcg32::seed_from_u64(7))
    }

    fn robot_at(position: Vec2) -> Ship {
        Ship::new(ShipId(1), position, 3)
    }

    fn armed_brain(now: u64, config: &Config, rng: &mut Pcg32) -> RobotBrain {
        let mut brain = RobotBrain::new(ShipId(1));
        brain.arm(now, config, rng);
        brain
    }

    #[test]
    fn test_unarmed_brain_is_silent() {
        let (config, mut rng) = setup();
        let mut brain = RobotBrain::new(ShipId(1));
        let ship = robot_at(Vec2::ZERO);
        let player = Ship::new(ShipId::PLAYER, Vec2::new(1000.0, 0.0), 3);

        let mut out = Vec::new();
        brain.think(&ship, &player, &[], &config, 0, &mut rng, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_dead_robot_decides_nothing() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        let mut ship = robot_at(Vec2::ZERO);
        ship.destroy();
        let player = Ship::new(ShipId::PLAYER, Vec2::new(1000.0, 0.0), 3);

        let mut out = Vec::new();
        brain.think(&ship, &player, &[], &config, 100_000, &mut rng, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_course_change_far_pursues_within_cone() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        let ship = robot_at(Vec2::ZERO);
        // Player due east, well past the pursue threshold
        let player = Ship::new(ShipId::PLAYER, Vec2::new(2000.0, 0.0), 3);

        let mut out = Vec::new();
        brain.think(&ship, &player, &[], &config, 0, &mut rng, &mut out);

        let course = out.iter().find_map(|c| match c {
            AiCommand::SetCourse {
                rotation, velocity, ..
            } => Some((*rotation, *velocity)),
            _ => None,
        });
        let (rotation, velocity) = course.expect("expected a course change");
        assert!(rotation.abs() <= PURSUE_CONE + 1e-4, "heading {rotation} outside cone");
        assert!((velocity.length() - config.max_ship_velocity).abs() < 1e-3);
    }

    #[test]
    fn test_course_change_near_wanders() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        let ship = robot_at(Vec2::ZERO);
        // Player close by: wander instead of pursue
        let player = Ship::new(ShipId::PLAYER, Vec2::new(100.0, 0.0), 3);

        let mut out = Vec::new();
        brain.think(&ship, &player, &[], &config, 0, &mut rng, &mut out);

        let velocity = out.iter().find_map(|c| match c {
            AiCommand::SetCourse { velocity, .. } => Some(*velocity),
            _ => None,
        });
        let speed = velocity.expect("expected a course change").length();
        assert!(speed >= config.max_ship_velocity / 2.0 - 1e-3);
        assert!(speed <= config.max_ship_velocity + 1e-3);
    }

    #[test]
    fn test_offensive_fire_aims_at_stationary_player() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        let ship = robot_at(Vec2::ZERO);
        let player = Ship::new(ShipId::PLAYER, Vec2::new(800.0, 0.0), 3);

        // Jump straight to the offensive fire due tick
        let mut out = Vec::new();
        brain.think(&ship, &player, &[], &config, 100_000, &mut rng, &mut out);

        let launch = out.iter().find_map(|c| match c {
            AiCommand::Launch { target, .. } => Some(*target),
            _ => None,
        });
        // Hard difficulty, stationary target: aim exactly at the player
        assert_eq!(launch.expect("expected a launch"), player.position);
    }

    #[test]
    fn test_offensive_fire_skips_dead_player() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        let ship = robot_at(Vec2::ZERO);
        let mut player = Ship::new(ShipId::PLAYER, Vec2::new(800.0, 0.0), 3);
        player.destroy();

        let mut out = Vec::new();
        brain.think(&ship, &player, &[], &config, 100_000, &mut rng, &mut out);
        assert!(!out.iter().any(|c| matches!(c, AiCommand::Launch { .. })));
    }

    fn inbound_torpedo(id: u32, position: Vec2, target: Vec2) -> Torpedo {
        Torpedo {
            id,
            position,
            target,
            owner: ShipId::PLAYER,
            launch_tick: 0,
        }
    }

    #[test]
    fn test_defensive_fire_hits_closing_torpedo() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        brain.next_course = u64::MAX;
        brain.next_fire = u64::MAX;
        let ship = robot_at(Vec2::ZERO);
        let player = Ship::new(ShipId::PLAYER, ship.position, 3);
        // Torpedo 300 units out, flying straight at the robot
        let torpedoes = [inbound_torpedo(1, Vec2::new(300.0, 0.0), Vec2::new(-100.0, 0.0))];

        let mut out = Vec::new();
        brain.think(&ship, &player, &torpedoes, &config, 100_000, &mut rng, &mut out);
        assert!(
            out.iter().any(|c| matches!(c, AiCommand::Launch { .. })),
            "no defensive launch against a closing torpedo"
        );
    }

    #[test]
    fn test_defensive_fire_ignores_receding_torpedo() {
        let (config, mut rng) = setup();
        // Restrict to the defensive timer by parking the other timers
        let mut brain = armed_brain(0, &config, &mut rng);
        brain.next_course = u64::MAX;
        brain.next_fire = u64::MAX;
        let ship = robot_at(Vec2::ZERO);
        let player = Ship::new(ShipId::PLAYER, ship.position, 3);
        // Torpedo in band but flying away
        let torpedoes = [inbound_torpedo(1, Vec2::new(300.0, 0.0), Vec2::new(900.0, 0.0))];

        let mut out = Vec::new();
        brain.think(&ship, &player, &torpedoes, &config, 100_000, &mut rng, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_defensive_fire_ignores_out_of_band_torpedoes() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        brain.next_course = u64::MAX;
        brain.next_fire = u64::MAX;
        let ship = robot_at(Vec2::ZERO);
        let player = Ship::new(ShipId::PLAYER, ship.position, 3);
        let torpedoes = [
            // Too close to react to
            inbound_torpedo(1, Vec2::new(50.0, 0.0), Vec2::new(-100.0, 0.0)),
            // Too far to care about
            inbound_torpedo(2, Vec2::new(900.0, 0.0), Vec2::new(-100.0, 0.0)),
        ];

        let mut out = Vec::new();
        brain.think(&ship, &player, &torpedoes, &config, 100_000, &mut rng, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_defensive_fire_one_shot_per_pass() {
        let (config, mut rng) = setup();
        let mut brain = armed_brain(0, &config, &mut rng);
        brain.next_course = u64::MAX;
        brain.next_fire = u64::MAX;
        let ship = robot_at(Vec2::ZERO);
        let player = Ship::new(ShipId::PLAYER, ship.position, 3);
        let torpedoes = [
            inbound_torpedo(1, Vec2::new(300.0, 0.0), Vec2::new(-100.0, 0.0)),
            inbound_torpedo(2, Vec2::new(0.0, 300.0), Vec2::new(0.0, -100.0)),
        ];

        let mut out = Vec::new();
        brain.think(&ship, &player, &torpedoes, &config, 100_000, &mut rng, &mut out);
        let launches = out
            .iter()
            .filter(|c| matches!(c, AiCommand::Launch { .. }))
            .count();
        assert_eq!(launches, 1);
    }

    #[test]
    fn test_easy_difficulty_doubles_intervals() {
        let easy = Config {
            difficulty: Difficulty::Easy,
            ..Default::default()
        };
        let hard = Config {
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        assert_eq!(fixed_interval(2.0, &easy), 2 * fixed_interval(2.0, &hard));
    }
}
