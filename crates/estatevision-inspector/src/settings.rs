use crate::error::InspectorError;
use estatevision_core::{Depth, Spacing};
use estatevision_graph::{BuildOptions, Color, UboTarget};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "estatevision";
const SETTINGS_FILE: &str = "inspector.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorSettings {
    pub default_depth: Depth,
    pub default_spacing: Spacing,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Directory searched for a `.ttf`/`.otf` label font.
    pub font_dir: Option<PathBuf>,
    pub background: Color,
    pub ubo_target: UboTarget,
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            default_depth: Depth::default(),
            default_spacing: Spacing::default(),
            canvas_width: 800,
            canvas_height: 600,
            font_dir: None,
            background: Color::TRANSPARENT,
            ubo_target: UboTarget::default(),
        }
    }
}

impl InspectorSettings {
    /// `<config dir>/estatevision/inspector.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Load from the user config directory, falling back to defaults on any problem.
    pub fn load() -> Self {
        if let Some(path) = Self::default_path() {
            tracing::info!("Loading settings from {:?}", path);
            match Self::load_from(&path) {
                Ok(settings) => return settings,
                Err(e) => tracing::error!("Failed to load settings: {}", e),
            }
        }
        Self::default()
    }

    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, InspectorError> {
        if !path.exists() {
            tracing::info!("Settings file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| InspectorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&content)?;
        tracing::debug!("Settings loaded: {:?}", settings);
        Ok(settings)
    }

    pub fn save(&self) {
        if let Some(path) = Self::default_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::error!("Failed to save settings: {}", e);
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), InspectorError> {
        let io_error = |source| InspectorError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_error)
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            ubo_target: self.ubo_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = InspectorSettings::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings, InspectorSettings::default());
        assert_eq!(settings.default_depth.get(), 2);
        assert_eq!(settings.default_spacing.get(), 100.0);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspector.json");
        std::fs::write(
            &path,
            r##"{ "default_depth": 3, "background": "#0f172a", "ubo_target": "detached" }"##,
        )
        .unwrap();

        let settings = InspectorSettings::load_from(&path).unwrap();
        assert_eq!(settings.default_depth.get(), 3);
        assert_eq!(settings.background, Color::rgb(0x0f, 0x17, 0x2a));
        assert_eq!(settings.ubo_target, UboTarget::Detached);
        assert_eq!(settings.canvas_width, 800);
        assert_eq!(settings.build_options().ubo_target, UboTarget::Detached);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspector.json");
        std::fs::write(&path, r#"{ "default_depth": 7 }"#).unwrap();
        assert!(matches!(
            InspectorSettings::load_from(&path),
            Err(InspectorError::Settings(_))
        ));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("inspector.json");
        let settings = InspectorSettings {
            canvas_width: 1024,
            font_dir: Some(PathBuf::from("/usr/share/fonts")),
            ..InspectorSettings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(InspectorSettings::load_from(&path).unwrap(), settings);
    }
}
