use thiserror::Error;

/// Errors raised at the boundary of the kinematics core.
///
/// Degenerate numeric cases (zero velocity, zero speed) are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Chassis dimensions must be finite and strictly positive.
    #[error("invalid geometry: width {width} and length {length} must be positive")]
    InvalidGeometry { width: f64, length: f64 },

    /// A command or timestep value was NaN or infinite.
    #[error("non-finite input for `{name}`: {value}")]
    NonFiniteInput { name: &'static str, value: f64 },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;

/// Reject NaN and infinities before they reach pose or module state.
pub fn ensure_finite(name: &'static str, value: f64) -> SimResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimError::NonFiniteInput { name, value })
    }
}
