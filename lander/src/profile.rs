//! Commanded vertical speed as a function of altitude.

use serde::{Deserialize, Serialize};

/// Altitude bands of the default schedule, highest first: (above altitude [m], speed [m/s])
const BANDS: [(f64, f64); 5] = [(4000.0, 24.0), (2000.0, 20.0), (500.0, 16.0), (100.0, 10.0), (20.0, 6.0)];
/// Commanded speed for the final approach, below the lowest band [m/s]
const TOUCHDOWN_SPEED: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetProfile {
    /// Six discrete altitude bands. The gains are tuned for this one.
    #[default]
    Banded,
    /// Steep logistic curve from 30 m/s at 4 km down to 1 m/s on the ground
    Logistic,
    /// Linear from 24 m/s at 4 km down to 1 m/s on the ground
    Linear,
    /// Gentle sigmoid between 1 and 24 m/s centered on 2 km
    Sigmoid,
}

impl TargetProfile {
    pub fn all() -> impl Iterator<Item = TargetProfile> {
        [Self::Banded, Self::Logistic, Self::Linear, Self::Sigmoid].into_iter()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Banded => "banded",
            Self::Logistic => "logistic",
            Self::Linear => "linear",
            Self::Sigmoid => "sigmoid",
        }
    }

    /// Commanded vertical speed [m/s, descent positive] at the given altitude [m].
    pub fn target_vertical_speed(&self, altitude: f64) -> f64 {
        match self {
            Self::Banded => BANDS
                .iter()
                .find(|(above, _)| altitude > *above)
                .map(|(_, speed)| *speed)
                .unwrap_or(TOUCHDOWN_SPEED),
            Self::Logistic => {
                if altitude >= 4000.0 {
                    return 30.0;
                }
                if altitude <= 0.0 {
                    return 1.0;
                }
                // x = 0 at 4 km, x = 1 on the ground
                let x = (4000.0 - altitude) / 4000.0;
                1.0 + 29.0 / (1.0 + ((x - 0.5) * 10.0).exp())
            }
            Self::Linear => 1.0 + 23.0 * (altitude.clamp(0.0, 4000.0) / 4000.0),
            Self::Sigmoid => 1.0 + 23.0 / (1.0 + (-0.002 * (altitude - 2000.0)).exp()),
        }
    }
}

impl std::str::FromStr for TargetProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown target profile '{}'", s))
    }
}
