use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use lander::TelemetrySnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unknown export format '{}', expected json or csv", s)),
        }
    }
}

pub fn create_file_or_stdout(path: Option<PathBuf>) -> Result<Box<dyn Write>, std::io::Error> {
    Ok(match path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    })
}

pub fn write_telemetry<W: Write>(
    mut output: W,
    telemetry: &[TelemetrySnapshot],
    format: ExportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut output, telemetry)?;
            output.write_all(b"\n")?;
        }
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(output);
            for snapshot in telemetry {
                wtr.serialize(snapshot)?;
            }
            wtr.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn telemetry() -> Vec<TelemetrySnapshot> {
        (0..3)
            .map(|t| TelemetrySnapshot {
                time: t as f64,
                altitude: 100.0 - 10.0 * t as f64,
                fuel_mass: 5.0,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn parses_formats() {
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn json_export_keeps_order() {
        let mut out = Vec::new();
        write_telemetry(&mut out, &telemetry(), ExportFormat::Json).unwrap();
        let parsed: Vec<TelemetrySnapshot> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, telemetry());
    }

    #[test]
    fn csv_export_has_header_and_one_row_per_tick() {
        let mut out = Vec::new();
        write_telemetry(&mut out, &telemetry(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("time,vertical_speed,horizontal_speed,commanded_vs"));
        assert!(lines[3].starts_with("2.0,"));
    }
}
