//! Operator input scaling
//!
//! Turns a normalized joystick + rotation slider reading into a `DriveCommand`.
//! The stick reports screen axes (right = +x, up = +y); the robot convention is
//! forward = +X, left = +Y.

use serde::{Deserialize, Serialize};

use crate::command::{DriveCommand, DriveMode};

/// Scale factors from normalized input to physical rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveLimits {
    /// Translation speed at full stick deflection, units/s.
    pub max_speed: f64,
    /// Yaw rate at full slider deflection, degrees/s.
    pub max_omega_deg: f64,
}

impl Default for DriveLimits {
    fn default() -> Self {
        DriveLimits {
            max_speed: 150.0,
            max_omega_deg: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriverInput {
    /// Stick deflection to the right, nominally `[-1, 1]`.
    pub stick_x: f64,
    /// Stick deflection upwards, nominally `[-1, 1]`.
    pub stick_y: f64,
    /// Rotation slider, `+1` is full CCW.
    pub rotation: f64,
}

impl DriverInput {
    pub fn new(stick_x: f64, stick_y: f64, rotation: f64) -> Self {
        DriverInput { stick_x, stick_y, rotation }
    }

    /// Stick position limited to the unit disk, as the joystick knob is.
    pub fn clamped_stick(&self) -> (f64, f64) {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        let (x, y) = (finite(self.stick_x), finite(self.stick_y));
        let dist = x.hypot(y);
        if dist > 1.0 {
            (x / dist, y / dist)
        } else {
            (x, y)
        }
    }

    pub fn to_command(&self, limits: &DriveLimits, mode: DriveMode) -> DriveCommand {
        let (x, y) = self.clamped_stick();
        let rotation = if self.rotation.is_finite() {
            self.rotation.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        // Up -> forward (+X), left -> +Y
        DriveCommand {
            vx: y * limits.max_speed,
            vy: -x * limits.max_speed,
            omega_deg: rotation * limits.max_omega_deg,
            mode,
        }
    }
}
