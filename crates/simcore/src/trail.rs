//! Path history for visualization.
//!
//! Samples are time-decimated and only taken while the robot is moving, so a
//! parked robot does not pile up points on one spot.

use std::collections::VecDeque;

use log::trace;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::{Model, RobotPose, TrailPoint};

/// Slack on the sample interval so accumulated float timesteps that land a
/// hair short of it still count.
const INTERVAL_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Maximum number of retained points.
    pub capacity: usize,
    /// Minimum time between samples, in seconds.
    pub min_interval: f64,
    /// Field speed (units/s, per axis) the robot must exceed to be sampled.
    pub speed_threshold: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        TrailConfig {
            capacity: 100,
            min_interval: 0.1,
            speed_threshold: 1.0,
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.capacity == 0 {
            return Err(SimError::InvalidConfig("trail capacity must be at least 1".into()));
        }
        if !(self.min_interval.is_finite() && self.min_interval >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "trail min_interval must be non-negative, got {}",
                self.min_interval
            )));
        }
        if !(self.speed_threshold.is_finite() && self.speed_threshold >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "trail speed_threshold must be non-negative, got {}",
                self.speed_threshold
            )));
        }
        Ok(())
    }
}

/// Bounded, oldest-first trail of sampled poses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailSampler {
    config: TrailConfig,
    points: VecDeque<TrailPoint>,
    last_sample: Option<f64>,
}

impl TrailSampler {
    pub fn new(config: TrailConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(TrailSampler {
            config,
            points: VecDeque::with_capacity(config.capacity),
            last_sample: None,
        })
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    /// Offer the pose at time `now` (seconds). Returns the appended point, if any.
    ///
    /// A sampler that retains nothing (zero capacity, e.g. from a hand-edited
    /// state file) never reports an append.
    pub fn observe(
        &mut self,
        now: f64,
        pose: &RobotPose,
        field_velocity: Vector2<f64>,
    ) -> Option<TrailPoint> {
        if self.config.capacity == 0 {
            return None;
        }
        let due = self
            .last_sample
            .map_or(true, |last| now - last >= self.config.min_interval - INTERVAL_EPSILON);
        let moving = field_velocity.x.abs() > self.config.speed_threshold
            || field_velocity.y.abs() > self.config.speed_threshold;

        if !(due && moving) {
            return None;
        }

        let point = TrailPoint::from(pose);
        self.points.push_back(point);
        while self.points.len() > self.config.capacity {
            self.points.pop_front();
        }
        self.last_sample = Some(now);
        trace!("trail sample ({:.1}, {:.1}), {} points", point.x, point.y, self.points.len());
        Some(point)
    }

    pub fn points(&self) -> &VecDeque<TrailPoint> {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn to_vec(&self) -> Vec<TrailPoint> {
        self.points.iter().copied().collect()
    }
}

impl Default for TrailSampler {
    fn default() -> Self {
        let config = TrailConfig::default();
        TrailSampler {
            config,
            points: VecDeque::with_capacity(config.capacity),
            last_sample: None,
        }
    }
}

impl Model for TrailSampler {
    fn reset(&mut self) {
        self.points.clear();
        self.last_sample = None;
    }
}
