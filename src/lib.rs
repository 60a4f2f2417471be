//! Torpedo Arena - a top-down space torpedo combat arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ship motion, AI, torpedoes, collisions)
//! - `config`: Runtime tuning knobs (ship/torpedo parameters, difficulty)

pub mod config;
pub mod sim;

pub use config::{Config, Difficulty};

use glam::Vec2;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the browser frame rate the
    /// motion model was tuned against)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICK_HZ: f32 = 60.0;

    /// A torpedo this close to its target point detonates
    pub const ARRIVAL_EPSILON: f32 = 2.0;
    /// Torpedoes self-detonate after this long in flight (seconds)
    pub const TORPEDO_TIMEOUT_SECS: f32 = 30.0;

    /// Robots spawn on a circle of this radius around the arena center
    pub const SPAWN_RADIUS: f32 = 400.0;

    /// Squared distance past which a robot steers toward the player instead
    /// of wandering
    pub const PURSUE_DISTANCE_SQ: f32 = 500.0 * 500.0;
    /// Defensive fire ignores torpedoes outside this squared-distance band
    pub const DEFENSIVE_NEAR_SQ: f32 = 100.0 * 100.0;
    pub const DEFENSIVE_FAR_SQ: f32 = 500.0 * 500.0;
    /// Course changes toward the player fan out within this half-angle so
    /// robots don't all converge on one line
    pub const PURSUE_CONE: f32 = std::f32::consts::FRAC_PI_3;

    /// AI behavior base intervals (seconds, before difficulty scaling)
    pub const COURSE_INTERVAL_SECS: f32 = 4.0;
    pub const FIRE_INTERVAL_SECS: f32 = 6.0;
    pub const DEFENSIVE_INTERVAL_SECS: f32 = 2.0;
    /// Uniform jitter applied to course/fire intervals (seconds)
    pub const INTERVAL_JITTER_SECS: f32 = 0.5;

    /// Player starts with this many lives
    pub const PLAYER_LIVES: u8 = 3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Seconds to whole simulation ticks, rounding to the nearest tick
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * consts::TICK_HZ).round().max(0.0) as u64
}
