//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (ships and torpedoes kept in id order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod intercept;
pub mod scheduler;
pub mod ship;
pub mod spatial;
pub mod state;
pub mod tick;

pub use ai::{AiCommand, RobotBrain};
pub use intercept::{intercept_point, is_closing};
pub use scheduler::{Event, Scheduler};
pub use ship::{Ship, ShipId};
pub use spatial::{Aabb, Obstacle, ObstacleIndex, StaticObstacles};
pub use state::{Explosion, GameEvent, GameInterface, GamePhase, Torpedo, World};
pub use tick::{TickInput, tick};
