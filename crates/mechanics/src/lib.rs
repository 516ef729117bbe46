pub mod frame;
pub mod swerve;

pub use frame::{field_to_robot, robot_to_field};
pub use swerve::{calculate_swerve_states, module_velocity, SwerveGeometry, DEFAULT_CHASSIS_SIZE};
