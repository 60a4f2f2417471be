//! Predictive torpedo intercept math
//!
//! Models a constant-velocity target and a constant-speed projectile and
//! solves for the earliest future meeting point. This is what lets robots
//! lead a moving player instead of shooting at where they used to be.

use glam::Vec2;

/// Relative target speeds within this of the projectile speed make the
/// quadratic degenerate; treat as unsolvable
const DEGENERATE_EPS: f32 = 1e-6;

/// Compute the point to aim a projectile at so it meets a target moving at
/// constant velocity.
///
/// Solves `a*t^2 + b*t + c = 0` for the flight time `t`, where
/// `a = |target_velocity|^2 - projectile_speed^2`,
/// `b = 2 * (target_position - shooter) . target_velocity`,
/// `c = |target_position - shooter|^2`,
/// then extrapolates the target by the smallest positive root.
///
/// Falls back to `target_position` whenever no intercept exists: negative
/// discriminant, both roots negative, or a degenerate quadratic (target as
/// fast as the projectile). Never returns NaN or infinity.
pub fn intercept_point(
    shooter: Vec2,
    target_position: Vec2,
    target_velocity: Vec2,
    projectile_speed: f32,
) -> Vec2 {
    let d = target_position - shooter;

    let a = target_velocity.length_squared() - projectile_speed * projectile_speed;
    let b = 2.0 * d.dot(target_velocity);
    let c = d.length_squared();

    // Target matching projectile speed exactly would divide by zero below
    if a.abs() < DEGENERATE_EPS {
        return target_position;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return target_position;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-b - sqrt_discriminant) / (2.0 * a);
    let t2 = (-b + sqrt_discriminant) / (2.0 * a);

    // Smallest positive root; if the earlier crossing is in the past, take
    // the later one
    let mut t = t1.min(t2);
    if t < 0.0 {
        t = t1.max(t2);
    }
    if t < 0.0 {
        return target_position;
    }

    target_position + target_velocity * t
}

/// True if the relative motion closes the distance (the threat is inbound).
/// `relative_position` points from the observer to the threat.
pub fn is_closing(relative_position: Vec2, relative_velocity: Vec2) -> bool {
    relative_velocity.dot(relative_position) < 0.0
}
