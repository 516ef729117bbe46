use log::trace;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use simcore::{ChassisSpeeds, ModuleId, ModuleState, ModuleStates, SimError, SimResult};

/// Reference chassis footprint used throughout the teaching scenes.
pub const DEFAULT_CHASSIS_SIZE: f64 = 200.0;

/// Rectangular swerve chassis with a module at each corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwerveGeometry {
    /// Side-to-side distance between module centers (along Y).
    width: f64,
    /// Front-to-back distance between module centers (along X).
    length: f64,
}

impl Default for SwerveGeometry {
    fn default() -> Self {
        SwerveGeometry {
            width: DEFAULT_CHASSIS_SIZE,
            length: DEFAULT_CHASSIS_SIZE,
        }
    }
}

impl SwerveGeometry {
    pub fn new(width: f64, length: f64) -> SimResult<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(length) {
            return Err(SimError::InvalidGeometry { width, length });
        }
        Ok(SwerveGeometry { width, length })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Offset of a module from the robot center in the robot frame.
    pub fn module_position(&self, id: ModuleId) -> Vector2<f64> {
        let (sx, sy) = id.corner_signs();
        Vector2::new(sx * self.length / 2.0, sy * self.width / 2.0)
    }

    /// Module offsets in FL, FR, RL, RR order.
    pub fn module_positions(&self) -> [Vector2<f64>; 4] {
        ModuleId::ALL.map(|id| self.module_position(id))
    }

    /// Module states for a stationary robot, all wheels pointing forward.
    pub fn rest_states(&self) -> ModuleStates {
        ModuleStates::new(ModuleId::ALL.map(|id| ModuleState::at_rest(id, self.module_position(id))))
    }

    /// Raw (unoptimized) wheel targets for a robot-frame chassis velocity.
    ///
    /// Angles come straight from `atan2` and lie in `(-180, 180]`; a wheel with
    /// no velocity reports angle 0 and speed 0.
    pub fn inverse_kinematics(&self, speeds: &ChassisSpeeds) -> ModuleStates {
        let states = ModuleId::ALL.map(|id| {
            let position = self.module_position(id);
            let velocity = module_velocity(speeds, &position);

            ModuleState {
                id,
                position,
                velocity,
                angle: velocity.y.atan2(velocity.x).to_degrees(),
                speed: velocity.x.hypot(velocity.y),
            }
        });
        trace!(
            "ik vx={:.2} vy={:.2} omega={:.3} -> speeds {:?}",
            speeds.vx,
            speeds.vy,
            speeds.omega,
            states.map(|s| s.speed)
        );
        ModuleStates::new(states)
    }
}

/// Velocity of a point rigidly attached to the chassis.
///
/// v_module = v_body + omega x r, with omega about +Z in rad/s.
pub fn module_velocity(speeds: &ChassisSpeeds, position: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(
        speeds.vx - speeds.omega * position.y,
        speeds.vy + speeds.omega * position.x,
    )
}

/// Solve the four raw module targets for a chassis of the given size.
///
/// `omega` is in radians per second. Fails only on non-positive dimensions.
pub fn calculate_swerve_states(
    vx: f64,
    vy: f64,
    omega: f64,
    width: f64,
    length: f64,
) -> SimResult<ModuleStates> {
    let geometry = SwerveGeometry::new(width, length)?;
    Ok(geometry.inverse_kinematics(&ChassisSpeeds::new(vx, vy, omega)))
}
