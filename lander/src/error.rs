use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// Settings that would make the integrator meaningless, e.g. a non-positive time step
    InvalidSettings(String),
    /// The lander did not reach the ground within the configured number of ticks
    Diverged { ticks: u64, altitude: f64 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSettings(reason) => write!(f, "invalid simulation settings: {}", reason),
            Self::Diverged { ticks, altitude } => {
                write!(f, "simulation diverged: still at {:.2} m after {} ticks", altitude, ticks)
            }
        }
    }
}

impl std::error::Error for SimulationError {}
