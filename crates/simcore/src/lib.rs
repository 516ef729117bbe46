//! Shared data model for the swerve kinematics simulator
//!
//! This crate provides:
//! - Module, pose and chassis velocity types
//! - Angle normalization
//! - The clamped pose integrator and trail sampler
//! - The common error type

pub mod angle;
pub mod error;
pub mod integrators;
pub mod trail;
pub mod traits;

pub use angle::{normalize_angle, shortest_rotation, unit_vector};
pub use error::{ensure_finite, SimError, SimResult};
pub use integrators::{FieldBounds, PoseIntegrator, DEFAULT_MAX_DT};
pub use trail::{TrailConfig, TrailSampler};
pub use traits::*;
