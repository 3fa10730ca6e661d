//! Controller gain sweeps. Every grid point is an independent descent.

use std::io::Write;

use log::*;

use lander::pid::PidGains;
use lander::{LandingLimits, Simulation, SimulationError, SimulationSettings, Touchdown};

#[derive(Clone, Debug)]
pub struct SweepResult {
    pub gains: PidGains,
    pub outcome: Result<Touchdown, SimulationError>,
}

/// `steps` evenly spaced gain multipliers from `min` to `max`.
pub fn multipliers(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => (0..steps)
            .map(|i| min + (max - min) * (i as f64) / ((steps - 1) as f64))
            .collect(),
    }
}

pub fn run_sweep(
    base: &SimulationSettings,
    min: f64,
    max: f64,
    steps: usize,
) -> Result<Vec<SweepResult>, Box<dyn std::error::Error>> {
    let factors = multipliers(min, max, steps);
    let total = factors.len().pow(3);

    let pb = indicatif::ProgressBar::new(total as u64);
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut results = Vec::with_capacity(total);
    for kp in &factors {
        for ki in &factors {
            for kd in &factors {
                let mut settings = base.clone();
                settings.controller = base.controller.scaled(*kp, *ki, *kd);

                let outcome = Simulation::new(&settings)?.run().map(|descent| descent.touchdown);
                if let Err(e) = &outcome {
                    debug!("Gains {:?}: {}", settings.controller, e);
                }

                results.push(SweepResult {
                    gains: settings.controller,
                    outcome,
                });
                pb.inc(1);
            }
        }
    }

    pb.finish_and_clear();
    Ok(results)
}

fn touchdown_speed(result: &SweepResult) -> f64 {
    match &result.outcome {
        Ok(touchdown) => touchdown.vertical_speed.abs(),
        Err(_) => f64::INFINITY,
    }
}

pub fn write_summary<W: Write>(w: &mut W, results: &[SweepResult], limits: &LandingLimits) -> std::io::Result<()> {
    let mut sorted: Vec<_> = results.iter().collect();
    sorted.sort_by(|a, b| touchdown_speed(a).total_cmp(&touchdown_speed(b)));

    writeln!(w, "{:<8} {:<8} {:<8} {:<8} {:<8} {:<8} {:<6}", "Kp", "Ki", "Kd", "VS", "HS", "Fuel", "Time")?;
    writeln!(w, "{}", "-".repeat(60))?;
    for r in sorted {
        match &r.outcome {
            Ok(t) => writeln!(
                w,
                "{:<8.4} {:<8.4} {:<8.4} {:<8.2} {:<8.2} {:<8.2} {:<6}{}",
                r.gains.kp,
                r.gains.ki,
                r.gains.kd,
                t.vertical_speed,
                t.horizontal_speed,
                t.fuel_mass,
                t.time,
                if t.is_soft(limits) { "" } else { " (crash)" }
            )?,
            Err(e) => writeln!(w, "{:<8.4} {:<8.4} {:<8.4} {}", r.gains.kp, r.gains.ki, r.gains.kd, e)?,
        }
    }

    let soft = results
        .iter()
        .filter(|r| r.outcome.as_ref().map(|t| t.is_soft(limits)).unwrap_or(false))
        .count();
    writeln!(w)?;
    writeln!(w, "{} of {} gain combinations landed softly.", soft, results.len())
}
