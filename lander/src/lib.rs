use log::*;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod guidance;
pub mod landing;
pub mod moon;
pub mod pid;
pub mod profile;
pub mod telemetry;
pub mod vehicle;

pub use error::SimulationError;
pub use landing::{Descent, LandingLimits, Touchdown};
pub use telemetry::TelemetrySnapshot;

use guidance::*;
use pid::*;
use profile::*;
use vehicle::*;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    #[default]
    Descending,
    Landed,
}

/// State of the lander when the powered descent begins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    /// [m/s, descent positive]
    pub vertical_speed: f64,
    /// [m/s]
    pub horizontal_speed: f64,
    /// Horizontal distance to the landing site [m]
    pub distance: f64,
    /// [m]
    pub altitude: f64,
    /// Thrust tilt [°]
    pub angle: f64,
    /// [kg]
    pub fuel_mass: f64,
    /// Throttle setting [0-1]
    pub thrust_fraction: f64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            vertical_speed: 24.8,
            horizontal_speed: 932.0,
            distance: 181.0 * 1000.0,
            altitude: 13748.0,
            angle: 58.3,
            fuel_mass: 121.0,
            thrust_fraction: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Integration time step [s]
    pub delta_time: f64,
    /// Upper bound on the number of ticks before the run is considered diverged
    pub max_ticks: u64,
    pub vehicle: VehicleSettings,
    pub controller: PidGains,
    pub guidance: GuidanceSettings,
    pub profile: TargetProfile,
    pub integral_reset: IntegralReset,
    pub initial: InitialConditions,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            delta_time: 1.0,
            max_ticks: 10_000,
            vehicle: VehicleSettings::default(),
            controller: PidGains::default(),
            guidance: GuidanceSettings::default(),
            profile: TargetProfile::default(),
            integral_reset: IntegralReset::default(),
            initial: InitialConditions::default(),
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |reason: &str| Err(SimulationError::InvalidSettings(reason.to_string()));
        let non_negative = |x: f64| x >= 0.0 && x.is_finite();

        if !(self.delta_time > 0.0 && self.delta_time.is_finite()) {
            return invalid("time step must be positive");
        }
        if self.max_ticks == 0 {
            return invalid("tick limit must be at least one");
        }

        let vehicle = &self.vehicle;
        if !(vehicle.empty_mass > 0.0 && vehicle.empty_mass.is_finite()) {
            return invalid("empty mass must be positive");
        }
        if !non_negative(vehicle.fuel_capacity) {
            return invalid("fuel capacity must not be negative");
        }
        if !non_negative(vehicle.main_engine_thrust) || !non_negative(vehicle.secondary_engine_thrust) {
            return invalid("engine thrust must not be negative");
        }
        if !non_negative(vehicle.main_burn_rate) || !non_negative(vehicle.secondary_burn_rate) {
            return invalid("burn rates must not be negative");
        }

        let initial = &self.initial;
        if !(initial.fuel_mass >= 0.0 && initial.fuel_mass <= vehicle.fuel_capacity) {
            return invalid("initial fuel must be between zero and the tank capacity");
        }
        if !(initial.altitude > 0.0 && initial.altitude.is_finite()) {
            return invalid("initial altitude must be above ground");
        }
        if ![initial.vertical_speed, initial.horizontal_speed, initial.distance].iter().all(|x| x.is_finite()) {
            return invalid("initial speeds and distance must be finite");
        }
        if !(0.0..=1.0).contains(&initial.thrust_fraction) {
            return invalid("initial thrust fraction must be between 0 and 1");
        }
        if !(0.0..=MAX_TILT).contains(&initial.angle) {
            return invalid("initial angle must be between 0 and 60 degrees");
        }

        let gains = self.controller;
        if !non_negative(gains.kp) || !non_negative(gains.ki) || !non_negative(gains.kd) {
            return invalid("controller gains must not be negative");
        }
        if let IntegralReset::Tolerance(band) = self.integral_reset {
            if !(band >= 0.0) {
                return invalid("integral reset band must not be negative");
            }
        }

        let guidance = &self.guidance;
        if !(guidance.vertical_below_altitude.is_finite() && guidance.min_descent_rate.is_finite()) {
            return invalid("guidance thresholds must be finite");
        }
        if !(guidance.min_time_to_land > 0.0 && guidance.min_time_to_land.is_finite()) {
            return invalid("minimum time to land must be positive");
        }
        if !(0.0 <= guidance.min_angle && guidance.min_angle <= guidance.max_angle && guidance.max_angle <= MAX_TILT) {
            return invalid("guidance angles must satisfy 0 <= min_angle <= max_angle <= 60");
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct SimulationState {
    /// Time since start of descent [s]
    pub time: f64,
    /// Number of completed ticks
    pub ticks: u64,
    pub flight_phase: FlightPhase,
    /// Vertical speed, descent positive [m/s]
    pub vertical_speed: f64,
    /// Horizontal speed [m/s]
    pub horizontal_speed: f64,
    /// Remaining horizontal distance [m]
    pub distance: f64,
    /// Altitude above ground [m]
    pub altitude: f64,
    /// Thrust tilt from vertical [°]
    pub angle: f64,
    /// Remaining fuel [kg]
    pub fuel_mass: f64,
    /// Empty mass plus remaining fuel [kg]
    pub weight: f64,
    /// Engine throttle [0-1]
    pub thrust_fraction: f64,
    /// Thrust acceleration [m/s²]
    pub acceleration: f64,
    /// Last commanded vertical speed [m/s]
    pub commanded_vs: f64,
}

#[derive(Clone)]
pub struct Simulation {
    settings: SimulationSettings,
    pub vehicle: Vehicle,
    pub controller: PidController,
    pub state: SimulationState,
}

impl Simulation {
    pub fn new(settings: &SimulationSettings) -> Result<Self, SimulationError> {
        settings.validate()?;

        let initial = &settings.initial;
        let vehicle = Vehicle::new(&settings.vehicle, initial.fuel_mass);
        let controller = PidController::new(settings.controller);

        let state = SimulationState {
            vertical_speed: initial.vertical_speed,
            horizontal_speed: initial.horizontal_speed,
            distance: initial.distance,
            altitude: initial.altitude,
            angle: initial.angle,
            fuel_mass: vehicle.fuel_mass(),
            weight: vehicle.weight(),
            thrust_fraction: initial.thrust_fraction,
            commanded_vs: settings.profile.target_vertical_speed(initial.altitude),
            ..Default::default()
        };

        Ok(Self {
            settings: settings.clone(),
            vehicle,
            controller,
            state,
        })
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn landed(&self) -> bool {
        self.state.flight_phase == FlightPhase::Landed
    }

    fn switch_phase(&mut self, phase: FlightPhase) {
        if phase == self.state.flight_phase {
            return;
        }
        info!(
            "{:?} -> {:?} at t={:.0}s (vs {:.2} m/s, hs {:.2} m/s, fuel {:.2} kg)",
            self.state.flight_phase,
            phase,
            self.state.time,
            self.state.vertical_speed,
            self.state.horizontal_speed,
            self.state.fuel_mass
        );
        self.state.flight_phase = phase;
    }

    /// Advances the lander by one time step. Does nothing once landed.
    pub fn tick(&mut self) {
        if self.landed() {
            return;
        }

        let dt = self.settings.delta_time;
        let state = &mut self.state;

        let target = self.settings.profile.target_vertical_speed(state.altitude);
        state.commanded_vs = target;

        if self.settings.integral_reset.triggered(state.vertical_speed, target) {
            debug!("On target ({:.2} m/s) at t={:.0}s, resetting integral", target, state.time);
            self.controller.reset_integral();
        }

        let thrust_fraction = self.controller.update(state.vertical_speed, dt, target);
        let acceleration = self.vehicle.burn(thrust_fraction, dt);
        let angle = self.settings.guidance.tilt_angle(
            state.altitude,
            state.vertical_speed,
            state.horizontal_speed,
            acceleration,
        );

        // (horizontal, vertical) components of the thrust acceleration
        let (sin, cos) = angle.to_radians().sin_cos();
        let mut thrust = Vector2::new(sin, cos) * acceleration;
        let gravity = moon::effective_gravity(state.horizontal_speed);

        state.time += dt;
        state.ticks += 1;

        thrust.y -= gravity;
        if state.horizontal_speed > 0.0 {
            state.horizontal_speed -= thrust.x * dt;
        }
        state.distance -= state.horizontal_speed * dt;
        state.vertical_speed -= thrust.y * dt;
        state.altitude -= dt * state.vertical_speed;

        state.thrust_fraction = thrust_fraction;
        state.acceleration = acceleration;
        state.angle = angle;
        state.fuel_mass = self.vehicle.fuel_mass();
        state.weight = self.vehicle.weight();

        if self.state.altitude <= 0.0 {
            self.switch_phase(FlightPhase::Landed);
        }
    }

    /// Runs the descent to the ground, collecting one snapshot per tick.
    pub fn run(&mut self) -> Result<Descent, SimulationError> {
        let mut telemetry = Vec::new();
        while let Some(snapshot) = self.next() {
            telemetry.push(snapshot);

            if !self.landed() && self.state.ticks >= self.settings.max_ticks {
                warn!("No touchdown after {} ticks, giving up at {:.2} m", self.state.ticks, self.state.altitude);
                return Err(SimulationError::Diverged {
                    ticks: self.state.ticks,
                    altitude: self.state.altitude,
                });
            }
        }

        Ok(Descent {
            telemetry,
            touchdown: Touchdown::from_state(&self.state),
        })
    }
}

impl Iterator for Simulation {
    type Item = TelemetrySnapshot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.landed() {
            return None;
        }

        let snapshot = TelemetrySnapshot::sample(&self.state);
        self.tick();
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> Simulation {
        Simulation::new(&SimulationSettings::default()).unwrap()
    }

    #[test]
    fn starts_from_initial_conditions() {
        let sim = nominal();
        assert_eq!(sim.state.flight_phase, FlightPhase::Descending);
        assert_eq!(sim.state.altitude, 13748.0);
        assert_eq!(sim.state.weight, 165.0 + 121.0);
        assert_eq!(sim.state.commanded_vs, 24.0);
        assert_eq!(sim.state.ticks, 0);
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut settings = SimulationSettings::default();
        settings.delta_time = 0.0;
        assert!(matches!(Simulation::new(&settings), Err(SimulationError::InvalidSettings(_))));

        let mut settings = SimulationSettings::default();
        settings.initial.fuel_mass = 500.0;
        assert!(matches!(Simulation::new(&settings), Err(SimulationError::InvalidSettings(_))));

        let mut settings = SimulationSettings::default();
        settings.controller.kd = -0.1;
        assert!(settings.validate().is_err());

        let mut settings = SimulationSettings::default();
        settings.initial.altitude = 0.0;
        assert!(settings.validate().is_err());

        assert!(SimulationSettings::default().validate().is_ok());
    }

    fn rejected(change: impl FnOnce(&mut SimulationSettings)) -> bool {
        let mut settings = SimulationSettings::default();
        change(&mut settings);
        matches!(settings.validate(), Err(SimulationError::InvalidSettings(_)))
    }

    #[test]
    fn rejects_guidance_limits_outside_the_tilt_range() {
        assert!(rejected(|s| s.guidance.min_angle = 70.0));
        assert!(rejected(|s| s.guidance.min_angle = -1.0));
        assert!(rejected(|s| s.guidance.max_angle = 75.0));
        assert!(rejected(|s| s.guidance.max_angle = f64::NAN));
        assert!(rejected(|s| s.guidance.min_angle = f64::NAN));
        assert!(rejected(|s| s.guidance.min_time_to_land = 0.0));
        assert!(rejected(|s| s.guidance.vertical_below_altitude = f64::INFINITY));
        assert!(rejected(|s| s.guidance.min_descent_rate = f64::NAN));

        assert!(!rejected(|s| {
            s.guidance.min_angle = 0.0;
            s.guidance.max_angle = 0.0;
        }));
    }

    #[test]
    fn guidance_from_file_cannot_panic_the_integrator() {
        let settings: SimulationSettings = serde_json::from_str(r#"{ "guidance": { "min_angle": 70.0 } }"#).unwrap();
        assert!(matches!(Simulation::new(&settings), Err(SimulationError::InvalidSettings(_))));
    }

    #[test]
    fn rejects_initial_state_outside_its_ranges() {
        assert!(rejected(|s| s.initial.thrust_fraction = 3.0));
        assert!(rejected(|s| s.initial.thrust_fraction = -0.1));
        assert!(rejected(|s| s.initial.angle = 90.0));
        assert!(rejected(|s| s.initial.angle = -5.0));
        assert!(rejected(|s| s.initial.fuel_mass = f64::NAN));
        assert!(rejected(|s| s.initial.horizontal_speed = f64::INFINITY));

        assert!(!rejected(|s| {
            s.initial.thrust_fraction = 1.0;
            s.initial.angle = 60.0;
        }));
    }

    #[test]
    fn rejects_nan_and_negative_engine_parameters() {
        assert!(rejected(|s| s.controller.kp = f64::NAN));
        assert!(rejected(|s| s.controller.ki = f64::NAN));
        assert!(rejected(|s| s.controller.kd = f64::INFINITY));
        assert!(rejected(|s| s.integral_reset = IntegralReset::Tolerance(f64::NAN)));
        assert!(rejected(|s| s.vehicle.main_engine_thrust = -2000.0));
        assert!(rejected(|s| s.vehicle.secondary_engine_thrust = f64::NAN));
        assert!(rejected(|s| s.vehicle.main_burn_rate = -1.0));
        assert!(rejected(|s| s.vehicle.secondary_burn_rate = -0.009));
        assert!(rejected(|s| s.delta_time = f64::INFINITY));
    }

    #[test]
    fn cloned_simulation_evolves_independently() {
        let mut sim = nominal();
        sim.tick();
        let mut copy = sim.clone();

        copy.tick();
        assert_eq!(sim.state.ticks, 1);
        assert_eq!(copy.state.ticks, 2);
        assert!(copy.vehicle.fuel_mass() < sim.vehicle.fuel_mass());

        sim.tick();
        assert_eq!(sim.state, copy.state);
        assert_eq!(sim.controller.integral(), copy.controller.integral());
    }

    #[test]
    fn first_tick_follows_the_controller() {
        let mut sim = nominal();
        sim.tick();

        // error 0.8 m/s: 0.04 + 0.04 + 0.08
        assert!((sim.state.thrust_fraction - 0.16).abs() < 1e-9);
        assert_eq!(sim.state.time, 1.0);
        assert_eq!(sim.state.ticks, 1);
        assert!(sim.state.fuel_mass < 121.0);
        assert_eq!(sim.state.weight, 165.0 + sim.state.fuel_mass);
        // not enough thrust to cancel 932 m/s in time, guidance tilts all the way
        assert_eq!(sim.state.angle, 60.0);
        assert!(sim.state.horizontal_speed < 932.0);
        assert!(sim.state.altitude < 13748.0);
    }

    #[test]
    fn integral_is_reset_when_on_target() {
        let mut sim = nominal();
        sim.controller.update(30.0, 1.0, 24.0);
        sim.controller.update(28.0, 1.0, 24.0);
        assert!(sim.controller.integral() > 0.0);

        sim.state.vertical_speed = 24.0;
        sim.tick();

        assert_eq!(sim.controller.integral(), 0.0);
        assert_eq!(sim.controller.last_error(), 0.0);
        // derivative of the dropping error closes the throttle entirely
        assert_eq!(sim.state.thrust_fraction, 0.0);
    }

    #[test]
    fn integral_survives_without_exact_match() {
        let mut sim = nominal();
        sim.controller.update(30.0, 1.0, 24.0);

        sim.state.vertical_speed = 24.5;
        sim.tick();
        assert!((sim.controller.integral() - 6.5).abs() < 1e-12);
    }

    #[test]
    fn tolerance_band_resets_near_target() {
        let mut settings = SimulationSettings::default();
        settings.integral_reset = IntegralReset::Tolerance(0.5);
        let mut sim = Simulation::new(&settings).unwrap();
        sim.controller.update(30.0, 1.0, 24.0);

        sim.state.vertical_speed = 24.25;
        sim.tick();
        assert!((sim.controller.integral() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn iterator_yields_state_before_each_tick() {
        let mut sim = nominal();
        let first = sim.next().unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.vertical_speed, 24.8);
        assert_eq!(first.thrust_fraction, 0.7);
        assert_eq!(first.angle, 58.3);

        let second = sim.next().unwrap();
        assert_eq!(second.time, 1.0);
        assert!((second.thrust_fraction - 0.16).abs() < 1e-9);
        assert_eq!(second.commanded_vs, 24.0);
        assert_eq!(sim.state.time, 2.0);
        assert!(sim.state.altitude < second.altitude);
    }

    #[test]
    fn landed_simulation_is_frozen() {
        let mut sim = nominal();
        sim.state.altitude = 1.0;
        sim.state.vertical_speed = 5.0;
        sim.tick();
        assert!(sim.landed());

        let frozen = sim.state.clone();
        sim.tick();
        assert_eq!(sim.state, frozen);
        assert!(sim.next().is_none());
    }

    #[test]
    fn tick_limit_reports_divergence() {
        let mut settings = SimulationSettings::default();
        settings.max_ticks = 50;
        let mut sim = Simulation::new(&settings).unwrap();

        match sim.run() {
            Err(SimulationError::Diverged { ticks, altitude }) => {
                assert_eq!(ticks, 50);
                assert!(altitude > 0.0);
            }
            other => panic!("expected divergence, got {:?}", other.map(|d| d.touchdown)),
        }
    }
}
