//! Display preferences that survive restarts
//!
//! Only the look of the face is kept (theme, particles, whether the settings
//! panel is open). Elapsed time and fired cues start fresh on every launch.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::Theme;
use crate::YogaApp;

/// Returns the path to the settings file: `~/.config/yoga-timer/settings.json`
fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("yoga-timer");
    path.push("settings.json");
    path
}

/// Errors reading or writing the settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted display preferences.
///
/// Serialized as JSON to the platform config directory. Timer progress is
/// never stored here. Fields use `#[serde(default)]` so that adding new
/// settings won't break existing config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: Theme,
    pub show_particles: bool,

    // Window
    pub show_settings: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_particles: true,
            show_settings: false,
        }
    }
}

impl AppSettings {
    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = settings_path();
        match Self::read(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk. Failures are logged and otherwise ignored.
    pub fn save(&self) {
        let path = settings_path();
        match self.write(&path) {
            Ok(()) => log::debug!("Saved settings to {}", path.display()),
            Err(e) => log::warn!("{}", e),
        }
    }

    fn read(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Extract current settings from the running application.
    pub fn from_app(app: &YogaApp) -> Self {
        Self {
            theme: app.face.settings.theme,
            show_particles: app.face.settings.show_particles,
            show_settings: app.show_settings,
        }
    }

    /// Apply loaded settings to the running application.
    pub fn apply(&self, app: &mut YogaApp) {
        app.face.settings.theme = self.theme;
        app.face.settings.show_particles = self.show_particles;
        app.show_settings = self.show_settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("yoga-timer-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{ "theme": "Ocean" }"#).unwrap();
        assert_eq!(settings.theme, Theme::Ocean);
        assert!(settings.show_particles);
        assert!(!settings.show_settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = scratch_dir("missing");
        match AppSettings::read(&dir.join("settings.json")) {
            Err(SettingsError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected not-found error, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = scratch_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppSettings::read(&path), Err(SettingsError::Json(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_then_read() {
        let dir = scratch_dir("save");
        let path = dir.join("nested").join("settings.json");
        let settings = AppSettings {
            theme: Theme::Forest,
            show_particles: false,
            show_settings: true,
        };
        settings.write(&path).unwrap();
        assert_eq!(AppSettings::read(&path).unwrap(), settings);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
