use std::ops::{Index, IndexMut};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::angle::{normalize_angle, unit_vector};

// Module layout

/// Wheel module position on the chassis.
///
/// The discriminant is the module's slot in every `[_; 4]` array; the order
/// FL, FR, RL, RR never changes between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleId {
    FrontLeft = 0,
    FrontRight = 1,
    RearLeft = 2,
    RearRight = 3,
}

impl ModuleId {
    pub const ALL: [ModuleId; 4] = [
        ModuleId::FrontLeft,
        ModuleId::FrontRight,
        ModuleId::RearLeft,
        ModuleId::RearRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            ModuleId::FrontLeft => "FL",
            ModuleId::FrontRight => "FR",
            ModuleId::RearLeft => "RL",
            ModuleId::RearRight => "RR",
        }
    }

    /// Sign of the corner offset as (forward, left).
    pub fn corner_signs(self) -> (f64, f64) {
        match self {
            ModuleId::FrontLeft => (1.0, 1.0),
            ModuleId::FrontRight => (1.0, -1.0),
            ModuleId::RearLeft => (-1.0, 1.0),
            ModuleId::RearRight => (-1.0, -1.0),
        }
    }
}

/// Steering and drive target for a single wheel module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleState {
    pub id: ModuleId,
    /// Offset from the robot center in the robot frame.
    pub position: Vector2<f64>,
    /// Wheel contact velocity in the robot frame.
    pub velocity: Vector2<f64>,
    /// Steering angle in degrees. In `(-180, 180]` straight out of the solver,
    /// continuous (unbounded) once optimized against the previous tick.
    pub angle: f64,
    /// Drive speed. Negative means the wheel drives backwards along `angle`.
    pub speed: f64,
}

impl ModuleState {
    pub fn at_rest(id: ModuleId, position: Vector2<f64>) -> Self {
        ModuleState {
            id,
            position,
            velocity: Vector2::zeros(),
            angle: 0.0,
            speed: 0.0,
        }
    }

    /// Steering angle wrapped into `(-180, 180]`.
    pub fn physical_angle(&self) -> f64 {
        normalize_angle(self.angle)
    }

    /// Velocity the wheel actually imparts: `speed * unit(angle)`.
    pub fn drive_vector(&self) -> Vector2<f64> {
        let (c, s) = unit_vector(self.angle);
        Vector2::new(self.speed * c, self.speed * s)
    }

    pub fn is_reversed(&self) -> bool {
        self.speed < 0.0
    }
}

/// The four module states, always in FL, FR, RL, RR order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleStates(pub [ModuleState; 4]);

impl ModuleStates {
    pub fn new(states: [ModuleState; 4]) -> Self {
        ModuleStates(states)
    }

    pub fn front_left(&self) -> &ModuleState {
        &self.0[ModuleId::FrontLeft.index()]
    }

    pub fn front_right(&self) -> &ModuleState {
        &self.0[ModuleId::FrontRight.index()]
    }

    pub fn rear_left(&self) -> &ModuleState {
        &self.0[ModuleId::RearLeft.index()]
    }

    pub fn rear_right(&self) -> &ModuleState {
        &self.0[ModuleId::RearRight.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleState> {
        self.0.iter()
    }
}

impl Default for ModuleStates {
    fn default() -> Self {
        ModuleStates(ModuleId::ALL.map(|id| ModuleState::at_rest(id, Vector2::zeros())))
    }
}

impl Index<ModuleId> for ModuleStates {
    type Output = ModuleState;

    fn index(&self, id: ModuleId) -> &ModuleState {
        &self.0[id.index()]
    }
}

impl IndexMut<ModuleId> for ModuleStates {
    fn index_mut(&mut self, id: ModuleId) -> &mut ModuleState {
        &mut self.0[id.index()]
    }
}

// Body state

/// Robot pose on the field. `heading` is in degrees, wrapped to `(-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RobotPose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl RobotPose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        RobotPose {
            x,
            y,
            heading: normalize_angle(heading),
        }
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

/// Robot-frame chassis velocity handed to the inverse kinematics.
/// `omega` is in radians per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChassisSpeeds {
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
}

impl ChassisSpeeds {
    pub fn new(vx: f64, vy: f64, omega: f64) -> Self {
        ChassisSpeeds { vx, vy, omega }
    }

    pub fn from_linear(linear: Vector2<f64>, omega: f64) -> Self {
        ChassisSpeeds {
            vx: linear.x,
            vy: linear.y,
            omega,
        }
    }

    pub fn linear(&self) -> Vector2<f64> {
        Vector2::new(self.vx, self.vy)
    }
}

/// A sampled point of the robot's path on the field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
}

impl From<&RobotPose> for TrailPoint {
    fn from(pose: &RobotPose) -> Self {
        TrailPoint { x: pose.x, y: pose.y }
    }
}

// General Traits

/// Timing of the tick currently being processed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimContext {
    /// Clamped timestep in seconds.
    pub dt: f64,
    /// Simulated time at the end of this tick.
    pub t: f64,
}

pub trait Model {
    fn reset(&mut self);
}
