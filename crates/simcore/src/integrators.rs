use log::warn;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::angle::normalize_angle;
use crate::error::{SimError, SimResult};
use crate::RobotPose;

/// Largest timestep a single tick may integrate, in seconds.
pub const DEFAULT_MAX_DT: f64 = 0.1;

/// Half-extents of the field; the robot center stays inside `[-x, x] × [-y, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldBounds {
    pub x: f64,
    pub y: f64,
}

impl Default for FieldBounds {
    fn default() -> Self {
        FieldBounds { x: 200.0, y: 250.0 }
    }
}

impl FieldBounds {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.x.is_finite() && self.y.is_finite() && self.x >= 0.0 && self.y >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "field bounds must be non-negative, got ({}, {})",
                self.x, self.y
            )));
        }
        Ok(())
    }
}

/// Explicit Euler pose integrator with a capped timestep and a hard clamp at
/// the field edge.
///
/// Position stops advancing at the boundary; the commanded velocity itself is
/// left untouched, so driving back off the wall works immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseIntegrator {
    max_dt: f64,
    bounds: FieldBounds,
}

impl Default for PoseIntegrator {
    fn default() -> Self {
        PoseIntegrator {
            max_dt: DEFAULT_MAX_DT,
            bounds: FieldBounds::default(),
        }
    }
}

impl PoseIntegrator {
    pub fn new(max_dt: f64, bounds: FieldBounds) -> SimResult<Self> {
        if !(max_dt.is_finite() && max_dt > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "max_dt must be positive, got {}",
                max_dt
            )));
        }
        bounds.validate()?;
        Ok(PoseIntegrator { max_dt, bounds })
    }

    pub fn max_dt(&self) -> f64 {
        self.max_dt
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    /// Clamp a raw frame delta into `[0, max_dt]`. NaN becomes zero.
    pub fn clamp_dt(&self, dt: f64) -> f64 {
        if dt.is_nan() || dt <= 0.0 {
            return 0.0;
        }
        if dt > self.max_dt {
            warn!("timestep {:.3}s exceeds cap, integrating {:.3}s", dt, self.max_dt);
            return self.max_dt;
        }
        dt
    }

    /// Advance `pose` by a field-frame velocity and a yaw rate in degrees/s.
    pub fn integrate(
        &self,
        pose: &RobotPose,
        field_velocity: Vector2<f64>,
        omega_deg_per_s: f64,
        dt: f64,
    ) -> RobotPose {
        let dt = self.clamp_dt(dt);

        let next = pose.position() + field_velocity * dt;

        RobotPose {
            x: next.x.clamp(-self.bounds.x, self.bounds.x),
            y: next.y.clamp(-self.bounds.y, self.bounds.y),
            heading: normalize_angle(pose.heading + omega_deg_per_s * dt),
        }
    }
}
