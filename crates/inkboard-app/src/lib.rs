//! Inkboard Application
//!
//! A headless shell around the whiteboard core: loads settings, replays
//! input scripts, repaints after every change and performs exports.

mod script;
mod session;
mod shortcuts;

use inkboard_core::config::{ConfigError, Settings};
use inkboard_core::shapes::ColorParseError;
use inkboard_render::RendererError;
use std::path::PathBuf;
use thiserror::Error;

pub use script::{Script, ScriptStep};
pub use session::{Notice, NoticeLevel, Session};
pub use shortcuts::{Shortcut, ShortcutRegistry};

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "INKBOARD_CONFIG";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Settings from `$INKBOARD_CONFIG`, else the per-user settings file,
/// else defaults.
pub fn load_settings() -> Result<Settings, AppError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(Settings::load(&PathBuf::from(path))?);
    }
    match Settings::default_path() {
        Ok(path) => Ok(Settings::load_or_default(&path)?),
        Err(e) => {
            log::warn!("{e}; using default settings");
            Ok(Settings::default())
        }
    }
}
