//! User configuration, stored as TOML or JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::DEFAULT_STROKE_WIDTH;
use crate::units::LengthUnit;

pub const CONFIG_FILE_NAME: &str = "bodystack.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub file_path: String,
    pub svg_path: String,
    /// Diagram file whose first body and lines shape every connector.
    pub template_path: String,
    pub stroke_width: f32,
    /// Width of the drawing area the first body is centred in.
    pub canvas_width: f32,
    pub show_rulers: bool,
    pub default_width_unit: LengthUnit,
    pub default_height_unit: LengthUnit,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            file_path: "diagram.json".to_string(),
            svg_path: "diagram.svg".to_string(),
            template_path: "threads.json".to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            canvas_width: 800.0,
            show_rulers: true,
            default_width_unit: LengthUnit::Inch,
            default_height_unit: LengthUnit::Centimeter,
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// First settings file that exists: `~/.config/bodystack.toml`, then
/// `settings.toml`, then `settings.json` in the working directory.
pub fn config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join(CONFIG_FILE_NAME));
    home.into_iter()
        .chain(["settings.toml", "settings.json"].map(PathBuf::from))
        .find(|p| p.exists())
}

/// Reads settings from `path`, trying the format its extension implies
/// first and the other one second.
pub fn load_settings(path: impl AsRef<Path>) -> Result<AppSettings> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let settings = if is_toml(path) {
        match toml::from_str(&text) {
            Ok(s) => s,
            Err(e) => serde_json::from_str(&text).map_err(|_| e)?,
        }
    } else {
        match serde_json::from_str(&text) {
            Ok(s) => s,
            Err(e) => toml::from_str(&text).map_err(|_| e)?,
        }
    };
    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Settings from the first config file found, or defaults.
pub fn load_or_default() -> AppSettings {
    let Some(path) = config_path() else {
        return AppSettings::default();
    };
    load_settings(&path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
        AppSettings::default()
    })
}

pub fn save_settings(path: impl AsRef<Path>, settings: &AppSettings) -> Result<()> {
    let path = path.as_ref();
    let text = if is_toml(path) {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    fs::write(path, text)?;
    Ok(())
}
