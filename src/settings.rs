//! Persisted user settings, kept in the OS config directory.

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::io::JsonFileStorage;
use crate::layout::{DAY_WIDTH, ROW_HEIGHT};
use crate::model::Period;

const APP_NAME: &str = "GanttTracker";
const DATA_FILE: &str = "projects.json";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overrides the default location of the project collection.
    pub data_file: Option<PathBuf>,
    pub day_width: f32,
    pub row_height: f32,
    pub default_period: Period,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            day_width: DAY_WIDTH,
            row_height: ROW_HEIGHT,
            default_period: Period::Month,
        }
    }
}

/// Resolved locations of the settings file and the default data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub settings: PathBuf,
    pub data: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Self {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
            Self {
                settings: proj_dirs.config_dir().join(SETTINGS_FILE),
                data: proj_dirs.data_dir().join(DATA_FILE),
            }
        } else {
            // No home directory: keep everything next to the process.
            let dir = PathBuf::from(".");
            Self {
                settings: dir.join(SETTINGS_FILE),
                data: dir.join(DATA_FILE),
            }
        }
    }
}

impl Settings {
    /// Read settings from `path`. Missing or malformed files give defaults.
    pub fn load(path: &Path) -> Self {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Settings>(&contents) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                warn!(
                    "event=settings_load module=settings status=fallback path={} error={e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, json)
    }

    /// Where the project collection lives under these settings.
    pub fn data_path(&self, paths: &AppPaths) -> PathBuf {
        self.data_file.clone().unwrap_or_else(|| paths.data.clone())
    }

    pub fn storage(&self, paths: &AppPaths) -> JsonFileStorage {
        JsonFileStorage::new(self.data_path(paths))
    }

    /// Replace non-positive or non-finite sizes with their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.day_width.is_finite() && self.day_width > 0.0) {
            self.day_width = defaults.day_width;
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            self.row_height = defaults.row_height;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "default_period": "quarter" }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.default_period, Period::Quarter);
        assert_eq!(settings.day_width, DAY_WIDTH);
        assert!(settings.data_file.is_none());
    }

    #[test]
    fn malformed_or_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(Settings::load(&path), Settings::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn invalid_sizes_are_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "day_width": -3.0, "row_height": 0.0 }"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.day_width, DAY_WIDTH);
        assert_eq!(settings.row_height, ROW_HEIGHT);
    }

    #[test]
    fn save_then_load_and_data_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            data_file: Some(dir.path().join("mine.json")),
            day_width: 32.0,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        assert_eq!(loaded, settings);

        let paths = AppPaths {
            settings: path,
            data: dir.path().join("default.json"),
        };
        assert_eq!(loaded.data_path(&paths), dir.path().join("mine.json"));
        assert_eq!(Settings::default().storage(&paths).path(), paths.data.as_path());
    }
}
