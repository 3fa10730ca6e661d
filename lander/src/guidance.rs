use serde::{Deserialize, Serialize};

/// Largest tilt of the thrust away from vertical [°]
pub const MAX_TILT: f64 = 60.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceSettings {
    /// Below this altitude the thrust is kept vertical [m]
    pub vertical_below_altitude: f64,
    /// Minimum descent rate for tilting to make sense [m/s]
    pub min_descent_rate: f64,
    /// Floor for the estimated time to touchdown [s]
    pub min_time_to_land: f64,
    /// Smallest tilt commanded while the guidance is active [°]
    pub min_angle: f64,
    /// Largest tilt commanded [°]
    pub max_angle: f64,
}

impl Default for GuidanceSettings {
    fn default() -> Self {
        Self {
            vertical_below_altitude: 5.0,
            min_descent_rate: 0.1,
            min_time_to_land: 0.1,
            min_angle: 5.0,
            max_angle: MAX_TILT,
        }
    }
}

impl GuidanceSettings {
    /// Thrust tilt angle [°] that nulls the horizontal speed by the estimated time of touchdown.
    ///
    /// Returns 0 (vertical thrust) close to the ground, when not descending, or when there is
    /// no thrust to tilt. Otherwise the horizontal share of the available acceleration is
    /// saturated at 1 and the resulting angle is kept within `[min_angle, max_angle]`.
    pub fn tilt_angle(&self, altitude: f64, vertical_speed: f64, horizontal_speed: f64, acceleration: f64) -> f64 {
        if altitude <= self.vertical_below_altitude || vertical_speed <= self.min_descent_rate || acceleration <= 0.0 {
            return 0.0;
        }

        let time_to_land = altitude / vertical_speed;
        let required_deceleration = horizontal_speed / time_to_land.max(self.min_time_to_land);
        let ratio = (required_deceleration / acceleration).clamp(0.0, 1.0);
        ratio.asin().to_degrees().clamp(self.min_angle, self.max_angle)
    }
}

/// `GuidanceSettings::tilt_angle` with the default limits.
pub fn tilt_angle(altitude: f64, vertical_speed: f64, horizontal_speed: f64, acceleration: f64) -> f64 {
    GuidanceSettings::default().tilt_angle(altitude, vertical_speed, horizontal_speed, acceleration)
}
