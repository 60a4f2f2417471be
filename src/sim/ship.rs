//! Ship entity and smoothed motion model
//!
//! A ship never jumps straight to what its pilot asked for. AI and input
//! layers only write the desired rotation/velocity; the actual state chases
//! the desired state a fraction per tick and snaps bit-exact once the
//! remaining delta is negligible, so ships bank into turns instead of
//! teleporting and never oscillate around the target.

use glam::Vec2;

use crate::normalize_angle;

/// Stable ship identifier. The player is always [`ShipId::PLAYER`]; robots
/// are numbered from 1 in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipId(pub u32);

impl ShipId {
    pub const PLAYER: ShipId = ShipId(0);

    pub fn is_player(&self) -> bool {
        *self == Self::PLAYER
    }
}

/// Remaining angular delta below this snaps rotation to the desired value
const ROTATION_SNAP: f32 = 1e-3;
/// Remaining squared velocity delta below this snaps velocity to the
/// desired value (avoids asymptotic creep)
const VELOCITY_SNAP_SQ: f32 = 1e-4;

/// A ship - the player or one robot
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: ShipId,
    /// Current position, written only by position integration
    pub position: Vec2,
    /// Current heading in radians, written only by [`Ship::advance`]
    pub rotation: f32,
    /// Current velocity, written only by [`Ship::advance`]
    pub velocity: Vec2,
    /// Heading the pilot wants
    pub desired_rotation: f32,
    /// Velocity the pilot wants; always clamped to the configured max
    desired_velocity: Vec2,
    /// Torpedo bays currently loaded
    pub ready_bays: u32,
    pub alive: bool,
    /// Bumped on every destroy and respawn; scheduled callbacks capture it
    /// so events aimed at a previous life become no-ops
    pub generation: u32,
}

impl Ship {
    pub fn new(id: ShipId, position: Vec2, bays: u32) -> Self {
        Self {
            id,
            position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            desired_rotation: 0.0,
            desired_velocity: Vec2::ZERO,
            ready_bays: bays,
            alive: true,
            generation: 0,
        }
    }

    pub fn desired_velocity(&self) -> Vec2 {
        self.desired_velocity
    }

    /// Set the desired velocity, clamping its magnitude to `max_velocity`
    /// while preserving direction
    pub fn set_desired_velocity(&mut self, velocity: Vec2, max_velocity: f32) {
        let speed_sq = velocity.length_squared();
        if speed_sq > max_velocity * max_velocity {
            self.desired_velocity = velocity / speed_sq.sqrt() * max_velocity;
        } else {
            self.desired_velocity = velocity;
        }
    }

    /// One fixed-timestep smoothing step: rotate and accelerate toward the
    /// desired state. Position integration happens separately.
    pub fn advance(&mut self, turn_rate: f32, acceleration_rate: f32, max_velocity: f32) {
        // Shortest signed angular path, wrapped to [-pi, pi)
        let delta = normalize_angle(self.desired_rotation - self.rotation);
        if delta.abs() <= ROTATION_SNAP {
            self.rotation = self.desired_rotation;
        } else {
            self.rotation = normalize_angle(self.rotation + delta * turn_rate);
        }

        let dv = self.desired_velocity - self.velocity;
        if dv.length_squared() <= VELOCITY_SNAP_SQ {
            self.velocity = self.desired_velocity;
        } else {
            self.velocity += dv * acceleration_rate;
        }

        // |velocity| <= max_velocity must hold after every step
        let speed_sq = self.velocity.length_squared();
        if speed_sq > max_velocity * max_velocity {
            self.velocity = self.velocity / speed_sq.sqrt() * max_velocity;
        }
    }

    /// Mark the ship destroyed. It stays in the ship list (debris handling
    /// is the renderer's business) but every sim pass skips it.
    pub fn destroy(&mut self) {
        self.alive = false;
        self.generation += 1;
        self.velocity = Vec2::ZERO;
        self.desired_velocity = Vec2::ZERO;
    }

    /// Bring the player back at `position` with a full loadout
    pub fn respawn(&mut self, position: Vec2, bays: u32) {
        self.alive = true;
        self.generation += 1;
        self.position = position;
        self.rotation = 0.0;
        self.desired_rotation = 0.0;
        self.velocity = Vec2::ZERO;
        self.desired_velocity = Vec2::ZERO;
        self.ready_bays = bays;
    }
}
