use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::*;

use lander::profile::TargetProfile;
use lander::{LandingLimits, Simulation, SimulationSettings};

mod export;
mod report;
mod settings;
mod sweep;

use export::*;

#[derive(Debug, Parser)]
#[clap(author, version, about = "Closed-loop lunar descent simulator", long_about = None)]
struct Cli {
    /// Settings file (JSON). Defaults to settings.json in the user's config directory, if present.
    #[clap(short = 's', long, global = true)]
    settings: Option<PathBuf>,
    #[clap(subcommand)]
    command: Option<CliCommand>,
}

/// Overrides for individual settings, applied on top of the settings file
#[derive(Debug, Clone, Default, Args)]
struct Overrides {
    /// Integration time step [s]
    #[clap(long)]
    dt: Option<f64>,
    /// Initial fuel mass [kg]
    #[clap(long)]
    fuel: Option<f64>,
    /// Initial altitude [m]
    #[clap(long)]
    altitude: Option<f64>,
    #[clap(long)]
    kp: Option<f64>,
    #[clap(long)]
    ki: Option<f64>,
    #[clap(long)]
    kd: Option<f64>,
    /// Commanded vertical speed profile: banded, logistic, linear or sigmoid
    #[clap(long)]
    profile: Option<TargetProfile>,
    /// Give up after this many ticks
    #[clap(long)]
    max_ticks: Option<u64>,
}

impl Overrides {
    fn apply(&self, settings: &mut SimulationSettings) {
        if let Some(dt) = self.dt {
            settings.delta_time = dt;
        }
        if let Some(fuel) = self.fuel {
            settings.initial.fuel_mass = fuel;
        }
        if let Some(altitude) = self.altitude {
            settings.initial.altitude = altitude;
        }
        if let Some(kp) = self.kp {
            settings.controller.kp = kp;
        }
        if let Some(ki) = self.ki {
            settings.controller.ki = ki;
        }
        if let Some(kd) = self.kd {
            settings.controller.kd = kd;
        }
        if let Some(profile) = self.profile {
            settings.profile = profile;
        }
        if let Some(max_ticks) = self.max_ticks {
            settings.max_ticks = max_ticks;
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum CliCommand {
    /// Simulate a descent and print the telemetry table [default]
    Simulate {
        #[clap(flatten)]
        overrides: Overrides,
    },
    /// Simulate a descent and write the full telemetry to a file
    Export {
        output: Option<PathBuf>,
        #[clap(short = 'f', long, default_value = "json", help = "Output format: json or csv")]
        format: ExportFormat,
        #[clap(flatten)]
        overrides: Overrides,
    },
    /// Run one descent per combination of scaled controller gains
    Sweep {
        #[clap(long, default_value_t = 5)]
        steps: usize,
        #[clap(long, default_value_t = 0.5, help = "Smallest gain multiplier")]
        min: f64,
        #[clap(long, default_value_t = 2.0, help = "Largest gain multiplier")]
        max: f64,
        #[clap(flatten)]
        overrides: Overrides,
    },
    /// Print the effective settings as JSON
    Settings {
        #[clap(long, help = "Also store them as the user's default settings")]
        save: bool,
        #[clap(flatten)]
        overrides: Overrides,
    },
}

fn load_settings(path: Option<&PathBuf>, overrides: &Overrides) -> Result<SimulationSettings, Box<dyn std::error::Error>> {
    let mut settings = settings::load(path.map(|p| p.as_path()))?;
    overrides.apply(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn simulate(settings: SimulationSettings) -> Result<(), Box<dyn std::error::Error>> {
    println!("\nSimulating descent ({} profile):\n", settings.profile.name());

    let mut sim = Simulation::new(&settings)?;
    let descent = sim.run()?;
    report::print_descent(&descent, settings.delta_time, &LandingLimits::default())?;
    Ok(())
}

fn export(settings: SimulationSettings, output: Option<PathBuf>, format: ExportFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = Simulation::new(&settings)?;
    let descent = sim.run()?;
    info!("Writing {} snapshots as {:?}", descent.telemetry.len(), format);

    let output = create_file_or_stdout(output)?;
    write_telemetry(output, &descent.telemetry, format)
}

fn sweep(settings: SimulationSettings, steps: usize, min: f64, max: f64) -> Result<(), Box<dyn std::error::Error>> {
    if steps == 0 || min < 0.0 || max < min {
        return Err("sweep needs at least one step and 0 <= min <= max".into());
    }

    let results = sweep::run_sweep(&settings, min, max, steps)?;
    sweep::write_summary(&mut std::io::stdout().lock(), &results, &LandingLimits::default())?;
    Ok(())
}

fn print_settings(settings: SimulationSettings, save: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&settings)?);
    if save {
        let path = settings::save(&settings, None)?;
        info!("Saved settings to {:?}", path);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new().filter_level(LevelFilter::Info).parse_default_env().init();

    let args = Cli::parse();
    let path = args.settings.as_ref();
    match args.command.unwrap_or(CliCommand::Simulate { overrides: Overrides::default() }) {
        CliCommand::Simulate { overrides } => simulate(load_settings(path, &overrides)?),
        CliCommand::Export {
            output,
            format,
            overrides,
        } => export(load_settings(path, &overrides)?, output, format),
        CliCommand::Sweep {
            steps,
            min,
            max,
            overrides,
        } => sweep(load_settings(path, &overrides)?, steps, min, max),
        CliCommand::Settings { save, overrides } => print_settings(load_settings(path, &overrides)?, save),
    }
}
