//! Per-tick orchestration
//!
//! One call to [`SwerveSimulation::step`] runs the whole pipeline for one
//! frame: frame transform, pose integration, trail sampling, inverse
//! kinematics and the per-module optimizer. All state carried between ticks
//! lives in [`SimulationState`], owned by the caller.

use control::optimize_module_states;
use log::{trace, warn};
use mechanics::{field_to_robot, robot_to_field, SwerveGeometry};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use simcore::{
    ChassisSpeeds, Model, ModuleStates, PoseIntegrator, RobotPose, SimContext, SimError, SimResult,
    TrailConfig, TrailPoint, TrailSampler,
};

use crate::command::{DriveCommand, DriveMode};
use crate::config::SimConfig;

/// Mutable state threaded from one tick to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub pose: RobotPose,
    /// Last published module states; their angles seed the next optimization.
    pub modules: ModuleStates,
    pub trail: TrailSampler,
    /// Simulated seconds, the sum of clamped timesteps.
    pub elapsed: f64,
}

impl Model for SimulationState {
    /// Return to the field origin and drop the trail. Module angles are kept
    /// so the wheels do not snap back to zero.
    fn reset(&mut self) {
        self.pose = RobotPose::default();
        self.trail.reset();
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepReport {
    /// Timestep actually integrated, after clamping.
    pub dt: f64,
    pub pose: RobotPose,
    pub modules: ModuleStates,
    pub trail_append: Option<TrailPoint>,
    /// Translational velocity in the robot frame, as fed to the solver.
    pub chassis_velocity: Vector2<f64>,
    /// Translational velocity in the field frame, as integrated.
    pub field_velocity: Vector2<f64>,
}

/// Fixed configuration of one simulated robot.
#[derive(Debug, Clone, PartialEq)]
pub struct SwerveSimulation {
    geometry: SwerveGeometry,
    integrator: PoseIntegrator,
    /// Validated, empty sampler cloned into every fresh state.
    trail: TrailSampler,
}

impl Default for SwerveSimulation {
    fn default() -> Self {
        SwerveSimulation {
            geometry: SwerveGeometry::default(),
            integrator: PoseIntegrator::default(),
            trail: TrailSampler::default(),
        }
    }
}

impl SwerveSimulation {
    pub fn new(geometry: SwerveGeometry, integrator: PoseIntegrator, trail: TrailConfig) -> SimResult<Self> {
        Ok(SwerveSimulation {
            geometry,
            integrator,
            trail: TrailSampler::new(trail)?,
        })
    }

    pub fn from_config(config: &SimConfig) -> SimResult<Self> {
        let geometry = SwerveGeometry::new(config.width, config.length)?;
        let integrator = PoseIntegrator::new(config.max_dt, config.field_bounds)?;
        SwerveSimulation::new(geometry, integrator, config.trail)
    }

    pub fn geometry(&self) -> &SwerveGeometry {
        &self.geometry
    }

    pub fn integrator(&self) -> &PoseIntegrator {
        &self.integrator
    }

    /// Robot at the origin, heading 0, wheels forward and stopped.
    pub fn initial_state(&self) -> SimulationState {
        SimulationState {
            pose: RobotPose::default(),
            modules: self.geometry.rest_states(),
            trail: self.trail.clone(),
            elapsed: 0.0,
        }
    }

    /// Advance `state` by one tick.
    ///
    /// `dt` is clamped into `[0, max_dt]`. A NaN/infinite command or a NaN `dt`
    /// is rejected and `state` is left untouched.
    pub fn step(&self, command: &DriveCommand, dt: f64, state: &mut SimulationState) -> SimResult<StepReport> {
        if let Err(err) = command.validate() {
            warn!("rejecting command {:?}: {}", command, err);
            return Err(err);
        }
        if dt.is_nan() {
            return Err(SimError::NonFiniteInput { name: "dt", value: dt });
        }

        let dt = self.integrator.clamp_dt(dt);
        let ctx = SimContext {
            dt,
            t: state.elapsed + dt,
        };

        let field_velocity = match command.mode {
            DriveMode::FieldCentric => command.linear(),
            DriveMode::RobotCentric => robot_to_field(command.linear(), state.pose.heading),
        };

        let pose = self.integrator.integrate(&state.pose, field_velocity, command.omega_deg, ctx.dt);
        let trail_append = state.trail.observe(ctx.t, &pose, field_velocity);

        // Wheels are solved against the heading the robot ends the tick with
        let chassis_velocity = match command.mode {
            DriveMode::FieldCentric => field_to_robot(command.linear(), pose.heading),
            DriveMode::RobotCentric => command.linear(),
        };
        let speeds = ChassisSpeeds::from_linear(chassis_velocity, command.omega_rad());
        let raw = self.geometry.inverse_kinematics(&speeds);
        let modules = optimize_module_states(&raw, &state.modules);

        state.pose = pose;
        state.modules = modules;
        state.elapsed = ctx.t;

        trace!(
            "t={:.3} pose=({:.1}, {:.1}, {:.1}°) chassis=({:.1}, {:.1})",
            ctx.t,
            pose.x,
            pose.y,
            pose.heading,
            chassis_velocity.x,
            chassis_velocity.y
        );

        Ok(StepReport {
            dt: ctx.dt,
            pose,
            modules,
            trail_append,
            chassis_velocity,
            field_velocity,
        })
    }
}

/// Free-function form of [`SwerveSimulation::step`].
pub fn simulation_step(
    simulation: &SwerveSimulation,
    command: &DriveCommand,
    dt: f64,
    state: &mut SimulationState,
) -> SimResult<StepReport> {
    simulation.step(command, dt, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use simcore::{normalize_angle, FieldBounds, ModuleId};

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_zero_command_keeps_robot_still() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        for _ in 0..60 {
            let report = sim.step(&DriveCommand::default(), DT, &mut state).unwrap();
            assert!(report.trail_append.is_none());
        }
        assert_eq!(state.pose, RobotPose::default());
        for module in state.modules.iter() {
            assert_eq!(module.speed, 0.0);
        }
        assert!(state.trail.is_empty());
    }

    #[test]
    fn test_field_centric_forward_after_turning() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        state.pose = RobotPose::new(0.0, 0.0, 90.0);

        let report = sim
            .step(&DriveCommand::field_centric(100.0, 0.0, 0.0), 0.05, &mut state)
            .unwrap();

        // Field +X while facing +Y is the robot's right
        assert_abs_diff_eq!(report.chassis_velocity.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(report.chassis_velocity.y, -100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.pose.x, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.pose.y, 0.0, epsilon = 1e-9);

        // Raw target is -90°, reachable from 0° without flipping
        for module in state.modules.iter() {
            assert_abs_diff_eq!(module.angle, -90.0, epsilon = 1e-9);
            assert_abs_diff_eq!(module.speed, 100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_robot_centric_moves_along_heading() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        state.pose = RobotPose::new(0.0, 0.0, 90.0);

        sim.step(&DriveCommand::robot_centric(100.0, 0.0, 0.0), 0.05, &mut state).unwrap();

        assert_abs_diff_eq!(state.pose.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.pose.y, 5.0, epsilon = 1e-9);
        for module in state.modules.iter() {
            assert_abs_diff_eq!(module.angle, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reversing_flips_drive_not_steering() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        sim.step(&DriveCommand::robot_centric(100.0, 0.0, 0.0), DT, &mut state).unwrap();
        sim.step(&DriveCommand::robot_centric(-100.0, 0.0, 0.0), DT, &mut state).unwrap();

        for module in state.modules.iter() {
            assert_abs_diff_eq!(module.angle, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(module.speed, -100.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_module_steering_stays_within_quarter_turn_per_tick() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        for i in 0..600 {
            let t = i as f64 * DT;
            let command = DriveCommand::field_centric(150.0 * (t * 1.3).cos(), 150.0 * (t * 0.7).sin(), 90.0 * (t * 0.4).sin());
            let previous = state.modules;
            sim.step(&command, DT, &mut state).unwrap();
            for id in ModuleId::ALL {
                let delta = normalize_angle(state.modules[id].angle - previous[id].angle);
                assert!(delta.abs() <= 90.0 + 1e-9);
                assert_abs_diff_eq!(state.modules[id].angle - previous[id].angle, delta, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        let report = sim.step(&DriveCommand::field_centric(100.0, 0.0, 0.0), 3.0, &mut state).unwrap();
        assert_abs_diff_eq!(report.dt, 0.1);
        assert_abs_diff_eq!(state.pose.x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.elapsed, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_rejected_command_leaves_state_untouched() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        sim.step(&DriveCommand::field_centric(10.0, 0.0, 5.0), DT, &mut state).unwrap();
        let before = state.clone();

        assert!(sim.step(&DriveCommand::field_centric(f64::NAN, 0.0, 0.0), DT, &mut state).is_err());
        assert!(sim.step(&DriveCommand::default(), f64::NAN, &mut state).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_reset_clears_pose_and_trail_only() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        for _ in 0..30 {
            sim.step(&DriveCommand::field_centric(0.0, 100.0, 0.0), DT, &mut state).unwrap();
        }
        assert!(!state.trail.is_empty());
        let modules = state.modules;

        state.reset();
        assert_eq!(state.pose, RobotPose::default());
        assert!(state.trail.is_empty());
        assert_eq!(state.modules, modules);
    }

    #[test]
    fn test_from_config_rejects_bad_geometry() {
        let config = SimConfig {
            width: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            SwerveSimulation::from_config(&config),
            Err(SimError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_infinite_dt_is_clamped_to_max_dt() {
        let sim = SwerveSimulation::default();
        let mut state = sim.initial_state();
        let report = sim
            .step(&DriveCommand::field_centric(0.0, 50.0, 90.0), f64::INFINITY, &mut state)
            .unwrap();
        assert_eq!(report.dt, sim.integrator().max_dt());
        assert_abs_diff_eq!(state.pose.y, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.pose.heading, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_new_rejects_invalid_trail_config() {
        let trail = TrailConfig {
            capacity: 0,
            ..TrailConfig::default()
        };
        assert!(matches!(
            SwerveSimulation::new(SwerveGeometry::default(), PoseIntegrator::default(), trail),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_initial_state_uses_configured_trail() {
        let config = SimConfig {
            trail: TrailConfig {
                capacity: 7,
                ..TrailConfig::default()
            },
            ..SimConfig::default()
        };
        let sim = SwerveSimulation::from_config(&config).unwrap();
        assert_eq!(sim.initial_state().trail.config().capacity, 7);
    }

    #[test]
    fn test_custom_bounds_from_config() {
        let config = SimConfig {
            field_bounds: FieldBounds { x: 5.0, y: 5.0 },
            ..SimConfig::default()
        };
        let sim = SwerveSimulation::from_config(&config).unwrap();
        let mut state = sim.initial_state();
        for _ in 0..100 {
            simulation_step(&sim, &DriveCommand::field_centric(-150.0, 150.0, 0.0), DT, &mut state).unwrap();
        }
        assert_eq!(state.pose.x, -5.0);
        assert_eq!(state.pose.y, 5.0);
    }
}
