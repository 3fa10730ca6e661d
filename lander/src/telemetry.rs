use serde::{Deserialize, Serialize};

use crate::SimulationState;

/// Immutable record of the lander state at the start of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Time since start of descent [s]
    pub time: f64,
    /// Vertical speed, descent positive [m/s]
    pub vertical_speed: f64,
    /// Horizontal speed [m/s]
    pub horizontal_speed: f64,
    /// Commanded vertical speed [m/s]
    pub commanded_vs: f64,
    /// Engine throttle [0-1]
    pub thrust_fraction: f64,
    /// Thrust tilt from vertical [°]
    pub angle: f64,
    /// Altitude above ground [m]
    pub altitude: f64,
    /// Remaining horizontal distance [m]
    pub distance: f64,
    /// Total mass [kg]
    pub weight: f64,
    /// Thrust acceleration [m/s²]
    pub acceleration: f64,
    /// Remaining fuel [kg]
    pub fuel_mass: f64,
}

impl TelemetrySnapshot {
    pub fn sample(state: &SimulationState) -> Self {
        Self {
            time: state.time,
            vertical_speed: state.vertical_speed,
            horizontal_speed: state.horizontal_speed,
            commanded_vs: state.commanded_vs,
            thrust_fraction: state.thrust_fraction,
            angle: state.angle,
            altitude: state.altitude,
            distance: state.distance,
            weight: state.weight,
            acceleration: state.acceleration,
            fuel_mass: state.fuel_mass,
        }
    }
}
