use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CONFY_APP_NAME;
use crate::picture::LookupMode;

const CONFIG_NAME: &str = "settings";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeSettings {
    /// Local path or http(s) URL of the dataset.
    pub dataset: String,
    pub lookup: LookupMode,
    pub radius: f64,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            dataset: "assets/pictures/compressed05_05.csv".to_string(),
            lookup: LookupMode::default(),
            radius: 100.0,
            width_segments: 360,
            height_segments: 360,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub pixels_per_radian: f64,
    pub recenter_duration_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            pixels_per_radian: 120.0,
            recenter_duration_ms: 500,
        }
    }
}

impl InteractionSettings {
    pub fn recenter_duration(&self) -> Duration {
        Duration::from_millis(self.recenter_duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub background_color: [f32; 3],
    pub light_color: [f32; 3],
    pub ambient: f32,
    pub far_plane: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0],
            light_color: [1.0, 1.0, 1.0],
            ambient: 0.15,
            far_plane: 10000.0,
        }
    }
}

// Aggregate struct for convenience
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub globe: GlobeSettings,
    pub interaction: InteractionSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Location of the user's settings file.
    pub fn path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(CONFY_APP_NAME, CONFIG_NAME)
    }

    pub fn load() -> Self {
        match Self::path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                log::warn!("Failed to locate settings: {err}");
                Self::default()
            }
        }
    }

    /// Load every section from one file, falling back to defaults when it is unreadable.
    pub fn load_from(path: &Path) -> Self {
        match confy::load_path(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Failed to load settings from {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        match Self::path() {
            Ok(path) => {
                self.save_or_warn(&path);
            }
            Err(err) => log::warn!("Failed to locate settings: {err}"),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), confy::ConfyError> {
        confy::store_path(path, self)
    }

    /// Returns whether the settings were written.
    fn save_or_warn(&self, path: &Path) -> bool {
        match self.save_to(path) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Failed to save settings to {}: {err}", path.display());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_constants() {
        let settings = Settings::default();
        assert_eq!(settings.interaction.pixels_per_radian, 120.0);
        assert_eq!(settings.interaction.recenter_duration(), Duration::from_millis(500));
        assert_eq!(settings.globe.lookup, LookupMode::Nearest);
        assert_eq!(settings.display.far_plane, 10000.0);
    }

    #[test]
    fn settings_survive_a_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("earthpic.toml");

        let mut settings = Settings::default();
        settings.globe.dataset = "https://example.com/picture.csv".to_string();
        settings.globe.lookup = LookupMode::Legacy;
        settings.interaction.recenter_duration_ms = 750;
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[interaction]\npixels_per_radian = 60.0\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.interaction.pixels_per_radian, 60.0);
        assert_eq!(settings.interaction.recenter_duration_ms, 500);
        assert_eq!(settings.globe, GlobeSettings::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn user_settings_live_in_one_file() {
        let path = Settings::path().unwrap();
        assert_eq!(path.file_name().unwrap(), "settings.toml");
        assert!(path.to_string_lossy().contains(CONFY_APP_NAME));
    }

    #[test]
    fn unwritable_location_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("settings.toml");

        let settings = Settings::default();
        assert!(settings.save_to(&path).is_err());
        assert!(!settings.save_or_warn(&path));
        assert!(settings.save_or_warn(&dir.path().join("ok.toml")));
    }
}
