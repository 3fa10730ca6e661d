//! Console output for finished descents.

use std::io::Write;

use colored::Colorize;

use lander::{Descent, LandingLimits, TelemetrySnapshot, Touchdown};

/// Interval between regular table rows [s]
const ROW_INTERVAL: f64 = 10.0;
/// Below this altitude every tick gets a row [m]
const DETAIL_ALTITUDE: f64 = 100.0;

fn show_row(index: usize, snapshot: &TelemetrySnapshot, delta_time: f64) -> bool {
    let every = (ROW_INTERVAL / delta_time).round().max(1.0) as usize;
    index % every == 0 || snapshot.altitude < DETAIL_ALTITUDE
}

pub fn write_table<W: Write>(w: &mut W, telemetry: &[TelemetrySnapshot], delta_time: f64) -> std::io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<6} {:<6} {:<8} {:<8} {:<6} {:<8} {:<6} {:<6}",
        "Time", "VS", "HS", "Distance", "Altitude", "Angle", "Weight", "Acc", "Fuel"
    )?;
    writeln!(w, "{}", "-".repeat(80))?;

    let rows = telemetry
        .iter()
        .enumerate()
        .filter(|(i, s)| show_row(*i, s, delta_time))
        .map(|(_, s)| s);

    for s in rows {
        writeln!(
            w,
            "{:<6} {:<6.2} {:<6.2} {:<8.2} {:<8.2} {:<6.2} {:<8.2} {:<6.2} {:<6.2}",
            s.time, s.vertical_speed, s.horizontal_speed, s.distance, s.altitude, s.angle, s.weight, s.acceleration, s.fuel_mass
        )?;
    }

    Ok(())
}

pub fn write_touchdown<W: Write>(w: &mut W, touchdown: &Touchdown, limits: &LandingLimits) -> std::io::Result<()> {
    let verdict = if touchdown.is_soft(limits) {
        "Soft landing".bright_green().bold()
    } else {
        "Crash".bright_red().bold()
    };

    writeln!(w)?;
    writeln!(w, "{} after {} s ({} ticks).", verdict, touchdown.time, touchdown.ticks)?;
    writeln!(
        w,
        "  vertical speed {:.2} m/s, horizontal speed {:.2} m/s, {:.2} m from target, {:.2} kg fuel left",
        touchdown.vertical_speed, touchdown.horizontal_speed, touchdown.distance, touchdown.fuel_mass
    )
}

pub fn print_descent(descent: &Descent, delta_time: f64, limits: &LandingLimits) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_table(&mut stdout, &descent.telemetry, delta_time)?;
    write_touchdown(&mut stdout, &descent.touchdown, limits)
}
