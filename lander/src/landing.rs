use serde::{Deserialize, Serialize};

use crate::{SimulationState, TelemetrySnapshot};

/// Result of a completed descent.
#[derive(Clone, Debug)]
pub struct Descent {
    /// One snapshot per tick, in order
    pub telemetry: Vec<TelemetrySnapshot>,
    pub touchdown: Touchdown,
}

/// State of the lander at ground contact.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Touchdown {
    /// [s]
    pub time: f64,
    pub ticks: u64,
    /// [m/s]
    pub vertical_speed: f64,
    /// [m/s]
    pub horizontal_speed: f64,
    /// Remaining distance to the landing site [m]
    pub distance: f64,
    /// [kg]
    pub fuel_mass: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingLimits {
    pub max_vertical_speed: f64,
    pub max_horizontal_speed: f64,
}

impl Default for LandingLimits {
    fn default() -> Self {
        Self {
            max_vertical_speed: 3.0,
            max_horizontal_speed: 2.0,
        }
    }
}

impl Touchdown {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            time: state.time,
            ticks: state.ticks,
            vertical_speed: state.vertical_speed,
            horizontal_speed: state.horizontal_speed,
            distance: state.distance,
            fuel_mass: state.fuel_mass,
        }
    }

    pub fn is_soft(&self, limits: &LandingLimits) -> bool {
        self.vertical_speed.abs() <= limits.max_vertical_speed
            && self.horizontal_speed.abs() <= limits.max_horizontal_speed
    }
}
