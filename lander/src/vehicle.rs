use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSettings {
    /// Mass without any fuel [kg]
    pub empty_mass: f64,
    /// Capacity of the fuel tanks [kg]
    pub fuel_capacity: f64,
    /// Thrust of the main engine [N]
    pub main_engine_thrust: f64,
    /// Thrust of a single secondary engine [N]
    pub secondary_engine_thrust: f64,
    /// Fuel consumption of the main engine at full power [kg/s]
    pub main_burn_rate: f64,
    /// Fuel consumption of a single secondary engine at full power [kg/s]
    pub secondary_burn_rate: f64,
    /// Number of secondary engines, all of them fire together with the main engine
    pub secondary_engines: u32,
}

impl Default for VehicleSettings {
    fn default() -> Self {
        Self {
            empty_mass: 165.0,
            fuel_capacity: 420.0,
            main_engine_thrust: 430.0,
            secondary_engine_thrust: 25.0,
            main_burn_rate: 0.15,
            secondary_burn_rate: 0.009,
            secondary_engines: 8,
        }
    }
}

impl VehicleSettings {
    /// Fuel consumption with all engines at full power [kg/s]
    pub fn combined_burn_rate(&self) -> f64 {
        self.main_burn_rate + (self.secondary_engines as f64) * self.secondary_burn_rate
    }

    /// Acceleration [m/s²] produced at the given weight by the main engine (if enabled)
    /// and `secondaries` secondary engines.
    pub fn acceleration(&self, weight: f64, main: bool, secondaries: u32) -> f64 {
        let mut thrust = if main { self.main_engine_thrust } else { 0.0 };
        thrust += (secondaries as f64) * self.secondary_engine_thrust;
        thrust / weight
    }

    /// Acceleration [m/s²] with every engine at full power.
    pub fn max_acceleration(&self, weight: f64) -> f64 {
        self.acceleration(weight, true, self.secondary_engines)
    }
}

#[derive(Clone, Debug)]
pub struct Vehicle {
    settings: VehicleSettings,
    fuel_mass: f64,
}

impl Vehicle {
    pub fn new(settings: &VehicleSettings, fuel_mass: f64) -> Self {
        Self {
            settings: settings.clone(),
            fuel_mass: fuel_mass.max(0.0),
        }
    }

    pub fn fuel_mass(&self) -> f64 {
        self.fuel_mass
    }

    pub fn weight(&self) -> f64 {
        self.settings.empty_mass + self.fuel_mass
    }

    pub fn out_of_fuel(&self) -> bool {
        self.fuel_mass <= 0.0
    }

    /// Fires all engines at `thrust_fraction` for `delta_time` seconds and returns the
    /// resulting acceleration [m/s²]. Without fuel the engines stay silent.
    pub fn burn(&mut self, thrust_fraction: f64, delta_time: f64) -> f64 {
        if self.out_of_fuel() {
            return 0.0;
        }

        let burned = delta_time * self.settings.combined_burn_rate() * thrust_fraction;
        self.fuel_mass -= burned.min(self.fuel_mass);
        if self.out_of_fuel() {
            self.fuel_mass = 0.0;
            warn!("Fuel exhausted, engines shut down");
        }

        self.settings.max_acceleration(self.weight()) * thrust_fraction
    }
}
