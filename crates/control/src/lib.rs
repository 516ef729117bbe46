//! Wheel-level command shaping
//!
//! This crate provides:
//! - The minimal-rotation module state optimizer (steer at most a quarter turn,
//!   reverse the drive instead)

pub mod module_optimizer;

pub use module_optimizer::*;
