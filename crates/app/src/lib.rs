//! Swerve drive teaching simulator
//!
//! This crate provides:
//! - JSON configuration for a simulated robot
//! - A shared command slot between the input side and the tick loop
//! - Joystick/slider scaling into chassis commands
//! - The per-tick simulation step

pub mod command;
pub mod config;
pub mod input;
pub mod simulation;

pub use command::{CommandSlot, DriveCommand, DriveMode};
pub use config::{ConfigError, SimConfig};
pub use input::{DriveLimits, DriverInput};
pub use simulation::{simulation_step, SimulationState, StepReport, SwerveSimulation};
