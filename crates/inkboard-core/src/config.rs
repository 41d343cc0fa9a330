//! User settings loaded from a JSON file.

use crate::camera::clamp_zoom;
use crate::shapes::SerializableColor;
use crate::tools::{ColorPalette, ToolKind, ToolStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Smallest sampling scale used when rasterizing for document export.
pub const MIN_DOCUMENT_SCALE: f64 = 2.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory exported files are written to.
    pub directory: PathBuf,
    /// Sampling scale for document export (at least 2).
    pub document_scale: f64,
    /// Color the surface is cleared to before drawing.
    pub background: SerializableColor,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            document_scale: MIN_DOCUMENT_SCALE,
            background: SerializableColor::white(),
        }
    }
}

/// Persistent whiteboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tool active at start-up.
    pub tool: ToolKind,
    /// Style applied to new elements.
    pub style: ToolStyle,
    /// Recent-color palette.
    pub palette: ColorPalette,
    /// Initial zoom.
    pub zoom: f64,
    /// Maximum number of history entries; unlimited when absent.
    pub history_limit: Option<usize>,
    pub export: ExportSettings,
    /// Font used for text elements; system fonts are tried when absent.
    pub font_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            style: ToolStyle::default(),
            palette: ColorPalette::default(),
            zoom: 1.0,
            history_limit: None,
            export: ExportSettings::default(),
            font_path: None,
        }
    }
}

impl Settings {
    /// `<config dir>/inkboard/settings.json`.
    pub fn default_path() -> ConfigResult<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("inkboard").join("settings.json"))
    }

    /// Parse settings from JSON, clamping out-of-range values.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validated()
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json()?).map_err(io_err)
    }

    /// Clamp ranged values and reject values that cannot be repaired.
    pub fn validated(mut self) -> ConfigResult<Self> {
        self.style = self.style.clamped();
        self.zoom = clamp_zoom(self.zoom);
        if !self.export.document_scale.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "export.document_scale",
                reason: format!("{} is not a number", self.export.document_scale),
            });
        }
        self.export.document_scale = self.export.document_scale.max(MIN_DOCUMENT_SCALE);
        if self.history_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "history_limit",
                reason: "must keep at least one entry".to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tool, ToolKind::Pen);
        assert_eq!(settings.style.color, SerializableColor::black());
        assert_eq!(settings.style.fill_color, None);
        assert!((settings.style.stroke_width - 2.0).abs() < f64::EPSILON);
        assert!((settings.style.font_size - 16.0).abs() < f64::EPSILON);
        assert!((settings.zoom - 1.0).abs() < f64::EPSILON);
        assert!(settings.history_limit.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "tool": "rectangle" }"#).unwrap();
        assert_eq!(settings.tool, ToolKind::Rectangle);
        assert_eq!(settings.style, ToolStyle::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let json = r#"{
            "style": { "stroke_width": 99, "opacity": 3.0, "font_size": 200 },
            "zoom": 12.0,
            "export": { "document_scale": 1.0 }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert!((settings.style.stroke_width - 20.0).abs() < f64::EPSILON);
        assert!((settings.style.opacity - 1.0).abs() < f64::EPSILON);
        assert!((settings.style.font_size - 72.0).abs() < f64::EPSILON);
        assert!((settings.zoom - 5.0).abs() < f64::EPSILON);
        assert!((settings.export.document_scale - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "history_limit": 0 }"#),
            Err(ConfigError::InvalidValue { field: "history_limit", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "tool": "brush" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.tool = ToolKind::Circle;
        settings.history_limit = Some(25);
        settings.palette.insert(SerializableColor::new(0x12, 0x34, 0x56, 0xFF));
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(Settings::load_or_default(&path).unwrap(), Settings::default());
        assert!(matches!(Settings::load(&path), Err(ConfigError::Io { .. })));
    }
}
