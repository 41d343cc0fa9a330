//! Input scripts: a recorded sequence of UI commands and pointer/keyboard
//! events, replayed against a session.

use crate::AppError;
use inkboard_core::input::{Key, KeyEvent, Modifiers, PointerEvent};
use inkboard_core::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded step.
///
/// Pointer coordinates are relative to the displayed canvas box. Colors are
/// hex strings; fills also accept `transparent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Tool { tool: ToolKind },
    Color { color: String },
    Fill { fill: String },
    StrokeWidth { width: f64 },
    Opacity { opacity: f64 },
    FontSize { size: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Submit the open text popup.
    Text { value: String },
    CancelText,
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        meta: bool,
    },
    Duplicate,
    Delete,
    Undo,
    Redo,
    Clear,
    ZoomIn,
    ZoomOut,
    Zoom { zoom: f64 },
    Resize { width: f64, height: f64 },
    ExportPng,
    ExportPdf,
    /// Log the status readout.
    Status,
}

impl ScriptStep {
    /// The pointer event this step carries, if any.
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            ScriptStep::Down { x, y } => Some(PointerEvent::Down {
                position: Point::new(x, y),
            }),
            ScriptStep::Move { x, y } => Some(PointerEvent::Move {
                position: Point::new(x, y),
            }),
            ScriptStep::Up { x, y } => Some(PointerEvent::Up {
                position: Point::new(x, y),
            }),
            _ => None,
        }
    }

    /// The key event this step carries, if any.
    pub fn key_event(&self) -> Option<KeyEvent> {
        match self {
            ScriptStep::Key {
                key,
                ctrl,
                shift,
                meta,
            } => Some(KeyEvent::new(
                Key::from_name(key),
                Modifiers {
                    shift: *shift,
                    ctrl: *ctrl,
                    alt: false,
                    meta: *meta,
                },
            )),
            _ => None,
        }
    }
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

/// A full script: initial canvas size plus steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Script {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::from_json(&json)?;
        log::info!("Loaded {} steps from {}", script.steps.len(), path.display());
        Ok(script)
    }
}
