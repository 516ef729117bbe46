//! Field ↔ robot frame rotation
//!
//! Both frames share the origin convention (+X forward/up, +Y left); they only
//! differ by the robot heading, measured CCW in degrees.

use nalgebra::{Rotation2, Vector2};

/// Express a field-frame velocity in the robot frame.
///
/// rVx =  fVx·cosθ + fVy·sinθ
/// rVy = -fVx·sinθ + fVy·cosθ
pub fn field_to_robot(field_velocity: Vector2<f64>, heading_deg: f64) -> Vector2<f64> {
    Rotation2::new(-heading_deg.to_radians()) * field_velocity
}

/// Express a robot-frame velocity in the field frame.
pub fn robot_to_field(robot_velocity: Vector2<f64>, heading_deg: f64) -> Vector2<f64> {
    Rotation2::new(heading_deg.to_radians()) * robot_velocity
}
