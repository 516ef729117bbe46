use std::sync::Arc;

use nalgebra::Vector2;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use simcore::{ensure_finite, SimResult};

/// Frame in which the translational part of a command is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    /// Translation is relative to the chassis: +X is wherever the robot faces.
    RobotCentric,
    /// Translation is relative to the field: +X is always field "up".
    #[default]
    FieldCentric,
}

/// Chassis command as published by the input side.
///
/// Linear velocity is in distance units per second in the frame given by
/// `mode`; `omega_deg` is the yaw rate in degrees per second, CCW positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DriveCommand {
    pub vx: f64,
    pub vy: f64,
    pub omega_deg: f64,
    pub mode: DriveMode,
}

impl DriveCommand {
    pub fn new(vx: f64, vy: f64, omega_deg: f64, mode: DriveMode) -> Self {
        DriveCommand { vx, vy, omega_deg, mode }
    }

    pub fn field_centric(vx: f64, vy: f64, omega_deg: f64) -> Self {
        DriveCommand::new(vx, vy, omega_deg, DriveMode::FieldCentric)
    }

    pub fn robot_centric(vx: f64, vy: f64, omega_deg: f64) -> Self {
        DriveCommand::new(vx, vy, omega_deg, DriveMode::RobotCentric)
    }

    pub fn linear(&self) -> Vector2<f64> {
        Vector2::new(self.vx, self.vy)
    }

    pub fn omega_rad(&self) -> f64 {
        self.omega_deg.to_radians()
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_finite("vx", self.vx)?;
        ensure_finite("vy", self.vy)?;
        ensure_finite("omega_deg", self.omega_deg)?;
        Ok(())
    }
}

/// Latest command shared between an input producer and the tick loop.
///
/// Writers replace the whole command at once and the tick takes one snapshot
/// at its start, so the three fields always come from the same update.
#[derive(Debug, Clone, Default)]
pub struct CommandSlot {
    inner: Arc<RwLock<DriveCommand>>,
}

impl CommandSlot {
    pub fn new(initial: DriveCommand) -> Self {
        CommandSlot {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn publish(&self, command: DriveCommand) {
        *self.inner.write() = command;
    }

    pub fn snapshot(&self) -> DriveCommand {
        *self.inner.read()
    }

    /// Zero the motion while keeping the drive mode.
    pub fn stop(&self) {
        let mut guard = self.inner.write();
        let mode = guard.mode;
        *guard = DriveCommand { mode, ..DriveCommand::default() };
    }
}
