//! Inkboard Core Library
//!
//! Platform-agnostic model and interaction logic for the Inkboard whiteboard.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod document;
pub mod history;
pub mod hit_test;
pub mod input;
pub mod shapes;
pub mod text_metrics;
pub mod tools;

pub use camera::{Camera, Viewport};
pub use canvas::{Canvas, Gesture, Status, TextPopup};
pub use config::{ConfigError, ExportSettings, Settings};
pub use document::DrawingState;
pub use history::History;
pub use hit_test::{find_element_at, selection_bounds};
pub use input::{Key, KeyEvent, Modifiers, PointerEvent, ShortcutAction};
pub use shapes::{Element, ElementId, ElementStyle, SerializableColor};
pub use text_metrics::{FallbackMeasurer, FontMeasurer, TextMeasurer};
pub use tools::{ColorPalette, ToolKind, ToolStyle};
