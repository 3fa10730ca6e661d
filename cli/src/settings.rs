use std::fs::File;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use log::*;

use lander::SimulationSettings;

fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let project_dirs = directories::ProjectDirs::from("space", "lunar", "moonlander")
        .ok_or_else(|| Error::new(ErrorKind::NotFound, "No home directory found."))?;
    Ok(project_dirs.config_dir().join("settings.json"))
}

pub fn load_from(path: &Path) -> Result<SimulationSettings, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let settings: SimulationSettings = serde_json::from_reader(f)?;
    Ok(settings)
}

/// Loads the settings from the given file, or from the user's config directory if
/// there is a file there. Falls back to the built-in defaults otherwise.
/// Nothing is validated here, command line overrides still have to be applied.
pub fn load(path: Option<&Path>) -> Result<SimulationSettings, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        info!("Loading settings from {:?}", path);
        return load_from(path);
    }

    match config_path() {
        Ok(path) if path.exists() => {
            info!("Loading settings from {:?}", path);
            load_from(&path)
        }
        _ => Ok(SimulationSettings::default()),
    }
}

pub fn save(settings: &SimulationSettings, path: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let f = File::create(&path)?;
    serde_json::to_writer_pretty(f, settings)?;
    Ok(path)
}
