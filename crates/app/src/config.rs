use std::fs;
use std::path::Path;

use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use simcore::{FieldBounds, SimError, TrailConfig, DEFAULT_MAX_DT};
use thiserror::Error;

use crate::command::DriveMode;
use crate::input::DriveLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SimError),
}

/// Everything needed to build one simulated robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side-to-side module spacing.
    pub width: f64,
    /// Front-to-back module spacing.
    pub length: f64,
    pub limits: DriveLimits,
    pub field_bounds: FieldBounds,
    /// Longest timestep integrated per tick, seconds.
    pub max_dt: f64,
    pub trail: TrailConfig,
    pub drive_mode: DriveMode,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            width: 200.0,
            length: 200.0,
            limits: DriveLimits::default(),
            field_bounds: FieldBounds::default(),
            max_dt: DEFAULT_MAX_DT,
            trail: TrailConfig::default(),
            drive_mode: DriveMode::FieldCentric,
            log_level: "info".to_string(),
        }
    }
}

impl SimConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.width.is_finite() && self.width > 0.0 && self.length.is_finite() && self.length > 0.0) {
            return Err(SimError::InvalidGeometry {
                width: self.width,
                length: self.length,
            });
        }
        let limits = [self.limits.max_speed, self.limits.max_omega_deg];
        if limits.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "drive limits must be non-negative, got {:?}",
                self.limits
            )));
        }
        self.field_bounds.validate()?;
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(SimError::InvalidConfig(format!("max_dt must be positive, got {}", self.max_dt)));
        }
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(SimError::InvalidConfig(format!("unknown log level `{}`", self.log_level)));
        }
        self.trail.validate()
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "width": 120.0, "drive_mode": "robot_centric" }"#).unwrap();
        assert_eq!(config.width, 120.0);
        assert_eq!(config.length, 200.0);
        assert_eq!(config.drive_mode, DriveMode::RobotCentric);
        assert_eq!(config.trail.capacity, 100);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let err = SimConfig::from_json(r#"{ "length": -5.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(SimError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_partial_nested_objects_fill_defaults() {
        let config = SimConfig::from_json(
            r#"{
                "trail": { "capacity": 5 },
                "limits": { "max_speed": 50.0 },
                "field_bounds": { "y": 80.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.trail.capacity, 5);
        assert_eq!(config.trail.min_interval, TrailConfig::default().min_interval);
        assert_eq!(config.trail.speed_threshold, TrailConfig::default().speed_threshold);
        assert_eq!(config.limits.max_speed, 50.0);
        assert_eq!(config.limits.max_omega_deg, DriveLimits::default().max_omega_deg);
        assert_eq!(config.field_bounds, FieldBounds { x: 200.0, y: 80.0 });
    }

    #[test]
    fn test_negative_field_bounds_rejected_at_load() {
        let err = SimConfig::from_json(r#"{ "field_bounds": { "x": -5.0, "y": 5.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let err = SimConfig::from_json(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(SimConfig::from_json("{ width: }"), Err(ConfigError::Parse(_))));
    }
}
