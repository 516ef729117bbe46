use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use simcore::{Model, ModuleStates, SimError};
use swerve_app::{DriveCommand, DriveMode, SimConfig, SimulationState, SwerveSimulation};

fn to_py_err(err: SimError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn modules_to_list(py: Python<'_>, modules: &ModuleStates) -> PyResult<PyObject> {
    let list = PyList::empty_bound(py);
    for module in modules.iter() {
        let dict = PyDict::new_bound(py);
        dict.set_item("id", module.id.label())?;
        dict.set_item("position", (module.position.x, module.position.y))?;
        dict.set_item("velocity", (module.velocity.x, module.velocity.y))?;
        dict.set_item("angle", module.angle)?;
        dict.set_item("speed", module.speed)?;
        list.append(dict)?;
    }
    Ok(list.into())
}

/// Wrap an angle in degrees into (-180, 180].
#[pyfunction]
fn normalize_angle(degrees: f64) -> f64 {
    simcore::normalize_angle(degrees)
}

/// Raw wheel targets (FL, FR, RL, RR) for a robot-frame command.
///
/// Args:
///     vx, vy: Robot-frame velocity.
///     omega: Yaw rate in radians per second.
///     width, length: Module spacing; must be positive.
#[pyfunction]
#[pyo3(signature = (vx, vy, omega, width=200.0, length=200.0))]
fn calculate_swerve_states(py: Python<'_>, vx: f64, vy: f64, omega: f64, width: f64, length: f64) -> PyResult<PyObject> {
    let states = mechanics::calculate_swerve_states(vx, vy, omega, width, length).map_err(to_py_err)?;
    modules_to_list(py, &states)
}

/// Minimal-rotation equivalent of a target. Returns (angle, speed).
#[pyfunction]
fn optimize_module_state(target_angle: f64, target_speed: f64, current_angle: f64) -> (f64, f64) {
    let result = control::optimize_module_state(target_angle, target_speed, current_angle);
    (result.angle, result.speed)
}

/// Python-accessible swerve kinematics simulator.
#[pyclass]
pub struct SwerveSim {
    simulation: SwerveSimulation,
    state: SimulationState,
    mode: DriveMode,
}

#[pymethods]
impl SwerveSim {
    /// Create a simulator for a chassis of the given size.
    ///
    /// Args:
    ///     width: Side-to-side module spacing.
    ///     length: Front-to-back module spacing.
    ///     field_centric: Interpret translation in the field frame.
    #[new]
    #[pyo3(signature = (width=200.0, length=200.0, field_centric=true))]
    fn new(width: f64, length: f64, field_centric: bool) -> PyResult<Self> {
        let config = SimConfig {
            width,
            length,
            ..SimConfig::default()
        };
        let simulation = SwerveSimulation::from_config(&config).map_err(to_py_err)?;
        let state = simulation.initial_state();
        let mode = if field_centric {
            DriveMode::FieldCentric
        } else {
            DriveMode::RobotCentric
        };
        Ok(SwerveSim { simulation, state, mode })
    }

    /// Step the simulation forward by dt seconds.
    ///
    /// Args:
    ///     vx, vy: Commanded translation.
    ///     omega_deg: Yaw rate in degrees per second.
    ///     dt: Time step in seconds; clamped to [0, 0.1].
    ///
    /// Returns the appended trail point as (x, y), or None.
    fn step(&mut self, vx: f64, vy: f64, omega_deg: f64, dt: f64) -> PyResult<Option<(f64, f64)>> {
        let command = DriveCommand::new(vx, vy, omega_deg, self.mode);
        let report = self
            .simulation
            .step(&command, dt, &mut self.state)
            .map_err(to_py_err)?;
        Ok(report.trail_append.map(|p| (p.x, p.y)))
    }

    /// Get the current pose as (x, y, heading_deg).
    fn pose(&self) -> (f64, f64, f64) {
        let pose = self.state.pose;
        (pose.x, pose.y, pose.heading)
    }

    /// Get module states as a list of dicts.
    fn module_states(&self, py: Python<'_>) -> PyResult<PyObject> {
        modules_to_list(py, &self.state.modules)
    }

    /// Get the trail as a list of (x, y), oldest first.
    fn trail(&self) -> Vec<(f64, f64)> {
        self.state.trail.points().iter().map(|p| (p.x, p.y)).collect()
    }

    /// Get the simulated time in seconds.
    fn get_time(&self) -> f64 {
        self.state.elapsed
    }

    /// Return the robot to the origin and clear the trail.
    fn reset(&mut self) {
        self.state.reset();
    }
}

/// Python module for the swerve kinematics simulator.
#[pymodule]
fn swerve_kinematics_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize_angle, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_swerve_states, m)?)?;
    m.add_function(wrap_pyfunction!(optimize_module_state, m)?)?;
    m.add_class::<SwerveSim>()?;
    Ok(())
}
