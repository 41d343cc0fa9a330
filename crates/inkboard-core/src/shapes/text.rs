//! Text label.

use super::{ElementId, ElementStyle, ElementTrait, is_finite_rect};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-line text label anchored at its baseline.
///
/// `text_width`/`text_height` are measured once at creation and only serve
/// hit-testing and the selection box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: ElementId,
    /// Left end of the baseline.
    pub position: Point,
    /// The text content.
    #[serde(rename = "text")]
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Cached layout width.
    pub text_width: f64,
    /// Cached layout height.
    pub text_height: f64,
    /// Style properties.
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Text {
    /// Default font size for new text.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    /// Width used when no measurement is available.
    pub const FALLBACK_WIDTH: f64 = 100.0;

    /// Create a new text element with its measured `(width, height)`.
    pub fn new(
        position: Point,
        content: String,
        font_size: f64,
        (text_width, text_height): (f64, f64),
        style: ElementStyle,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size,
            text_width,
            text_height,
            style,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl ElementTrait for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Option<Rect> {
        let rect = Rect::new(
            self.position.x,
            self.position.y - self.text_height,
            self.position.x + self.text_width,
            self.position.y,
        );
        is_finite_rect(rect).then_some(rect)
    }

    fn to_path(&self) -> BezPath {
        // Glyphs are laid out by the renderer; the box stands in for them.
        self.bounds()
            .map(|bounds| bounds.to_path(0.1))
            .unwrap_or_default()
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_sit_above_baseline() {
        let text = Text::new(
            Point::new(10.0, 50.0),
            "hello".to_string(),
            16.0,
            (40.0, 16.0),
            ElementStyle::default(),
        );
        assert_eq!(text.bounds().unwrap(), Rect::new(10.0, 34.0, 50.0, 50.0));
    }

    #[test]
    fn test_serialized_field_names() {
        let text = Text::new(
            Point::new(0.0, 0.0),
            "hi".to_string(),
            16.0,
            (12.0, 16.0),
            ElementStyle::default(),
        );
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["text"], "hi");
        assert_eq!(json["fontSize"], 16.0);
        assert_eq!(json["textWidth"], 12.0);
        assert_eq!(json["strokeWidth"], 2.0);
        assert!(json["fillColor"].is_null());
        assert!(json.get("font_size").is_none());
    }
}
