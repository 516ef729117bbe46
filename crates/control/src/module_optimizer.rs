//! Minimal-rotation steering
//!
//! A swerve wheel pointing at `a` and driving at `s` moves the robot exactly
//! like one pointing at `a + 180` driving at `-s`. Whenever reaching the raw
//! target would cost more than a quarter turn, the optimizer takes the flipped
//! representation instead.

use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{shortest_rotation, ModuleId, ModuleStates};

/// Largest steering change a module is ever asked to make in one tick.
pub const MAX_STEER_DELTA_DEG: f64 = 90.0;

/// Steering angle and signed drive speed after optimization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizedModule {
    /// Continuous angle in degrees, within 90° of the previous angle.
    pub angle: f64,
    pub speed: f64,
}

impl OptimizedModule {
    /// True when the drive direction was reversed relative to the raw target.
    pub fn flipped_from(&self, target_speed: f64) -> bool {
        target_speed != 0.0 && self.speed == -target_speed
    }
}

/// Pick the representation of `(target_angle, target_speed)` closest to
/// `current_angle`.
///
/// The returned angle is `current_angle + delta` without re-wrapping, so it
/// may leave `(-180, 180]`; callers feed it back as next tick's
/// `current_angle`.
pub fn optimize_module_state(target_angle: f64, target_speed: f64, current_angle: f64) -> OptimizedModule {
    let mut delta = shortest_rotation(current_angle, target_angle);
    let mut speed = target_speed;

    if delta.abs() > MAX_STEER_DELTA_DEG {
        speed = -target_speed;
        delta = shortest_rotation(current_angle, target_angle + 180.0);
    }

    OptimizedModule {
        angle: current_angle + delta,
        speed,
    }
}

/// Optimize every raw module target against the same module's previous state.
///
/// Position and velocity are taken from `raw`; only angle and speed change.
pub fn optimize_module_states(raw: &ModuleStates, previous: &ModuleStates) -> ModuleStates {
    let mut optimized = *raw;
    for id in ModuleId::ALL {
        let target = &raw[id];
        let result = optimize_module_state(target.angle, target.speed, previous[id].angle);
        if result.flipped_from(target.speed) {
            debug!(
                "{} flipped: target {:.1}° -> {:.1}°, speed {:.2}",
                id.label(),
                target.angle,
                result.angle,
                result.speed
            );
        }
        optimized[id].angle = result.angle;
        optimized[id].speed = result.speed;
    }
    optimized
}
