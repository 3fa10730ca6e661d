use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        // tuned for the default vehicle at dt = 1s
        Self {
            kp: 0.05,
            ki: 0.05,
            kd: 0.1,
        }
    }
}

impl PidGains {
    pub fn scaled(&self, kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp: self.kp * kp,
            ki: self.ki * ki,
            kd: self.kd * kd,
        }
    }
}

/// When to drop the accumulated integral term.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum IntegralReset {
    /// Reset when the measured vertical speed is exactly the commanded one
    #[default]
    Exact,
    /// Reset when the measured vertical speed is within the given band [m/s]
    Tolerance(f64),
    /// Never reset, integral keeps accumulating for the entire descent
    Never,
}

impl IntegralReset {
    pub fn triggered(&self, measured: f64, target: f64) -> bool {
        match self {
            Self::Exact => measured == target,
            Self::Tolerance(band) => (measured - target).abs() <= *band,
            Self::Never => false,
        }
    }
}

/// Vertical speed controller. Turns a speed error into a throttle setting in [0, 1].
#[derive(Clone, Debug, Default)]
pub struct PidController {
    gains: PidGains,
    /// error of the previous update
    last_error: f64,
    /// accumulated error, already including the current step once `update` returns
    integral: f64,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            last_error: 0.0,
            integral: 0.0,
        }
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn reset_integral(&mut self) {
        self.integral = 0.0;
    }

    /// Computes the thrust fraction for a measured and commanded vertical speed.
    /// `dt` has to be positive, which `SimulationSettings::validate` guarantees.
    pub fn update(&mut self, measured: f64, dt: f64, target: f64) -> f64 {
        let error = measured - target;
        let derivative = (error - self.last_error) / dt;
        self.integral += error * dt;
        self.last_error = error;

        let output = error * self.gains.kp + self.integral * self.gains.ki + derivative * self.gains.kd;
        output.clamp(0.0, 1.0)
    }
}
