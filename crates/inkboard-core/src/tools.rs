//! Drawing tools, the live tool style and the recent-color palette.

use crate::shapes::{
    Circle, Element, ElementStyle, Line, Rectangle, SerializableColor, Triangle,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stroke width range accepted by the style controls.
pub const STROKE_WIDTH_RANGE: (f64, f64) = (1.0, 20.0);
/// Font size range accepted by the style controls.
pub const FONT_SIZE_RANGE: (f64, f64) = (8.0, 72.0);
/// Stroke width given to text elements.
pub const TEXT_STROKE_WIDTH: f64 = 1.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Pen,
    Rectangle,
    Circle,
    Triangle,
    Line,
    Text,
    Eraser,
}

impl ToolKind {
    /// Every tool, in toolbar order.
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Select,
        ToolKind::Pen,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Line,
        ToolKind::Text,
        ToolKind::Eraser,
    ];

    /// Identifier used by commands and the status readout.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pen => "pen",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Line => "line",
            ToolKind::Text => "text",
            ToolKind::Eraser => "eraser",
        }
    }

    /// Tools that create a two-point shape from a drag.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Triangle | ToolKind::Line
        )
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised tool identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolKind {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Style applied to newly created elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolStyle {
    pub color: SerializableColor,
    /// None = transparent.
    pub fill_color: Option<SerializableColor>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub font_size: f64,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            fill_color: None,
            stroke_width: 2.0,
            opacity: 1.0,
            font_size: 16.0,
        }
    }
}

impl ToolStyle {
    /// Clamp every value into its accepted range.
    pub fn clamped(mut self) -> Self {
        self.stroke_width = clamp_stroke_width(self.stroke_width);
        self.opacity = clamp_opacity(self.opacity);
        self.font_size = clamp_font_size(self.font_size);
        self
    }

    /// Element style for pen strokes and shapes.
    ///
    /// Pen and line ignore the fill when rendering, so it is carried as-is.
    pub fn element_style(&self) -> ElementStyle {
        ElementStyle {
            color: self.color,
            stroke_width: self.stroke_width,
            fill_color: self.fill_color,
            opacity: self.opacity,
        }
    }

    /// Element style for text labels: thin stroke, no fill.
    pub fn text_style(&self) -> ElementStyle {
        ElementStyle {
            color: self.color,
            stroke_width: TEXT_STROKE_WIDTH,
            fill_color: None,
            opacity: self.opacity,
        }
    }
}

/// Clamp a stroke width to 1-20 (whole pixels).
pub fn clamp_stroke_width(width: f64) -> f64 {
    if width.is_nan() {
        return 2.0;
    }
    width.round().clamp(STROKE_WIDTH_RANGE.0, STROKE_WIDTH_RANGE.1)
}

/// Clamp opacity to 0.0-1.0.
pub fn clamp_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        return 1.0;
    }
    opacity.clamp(0.0, 1.0)
}

/// Clamp a font size to 8-72.
pub fn clamp_font_size(size: f64) -> f64 {
    if size.is_nan() {
        return 16.0;
    }
    size.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1)
}

/// Build the element a shape tool produces for a drag from `start` to `end`.
///
/// Returns `None` for tools that do not draw two-point shapes.
pub fn shape_from_drag(
    tool: ToolKind,
    start: Point,
    end: Point,
    style: &ToolStyle,
) -> Option<Element> {
    let style = style.element_style();
    match tool {
        ToolKind::Rectangle => Some(Element::Rectangle(Rectangle::new(start, end, style))),
        ToolKind::Circle => Some(Element::Circle(Circle::new(start, end, style))),
        ToolKind::Triangle => Some(Element::Triangle(Triangle::new(start, end, style))),
        ToolKind::Line => Some(Element::Line(Line::new(start, end, style))),
        ToolKind::Select | ToolKind::Pen | ToolKind::Text | ToolKind::Eraser => None,
    }
}

/// Recently used stroke colors: two fixed slots followed by a
/// most-recent-first list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SerializableColor>", into = "Vec<SerializableColor>")]
pub struct ColorPalette {
    colors: Vec<SerializableColor>,
}

impl ColorPalette {
    /// Number of slots.
    pub const SIZE: usize = 8;
    /// Slots that never change.
    pub const FIXED: [SerializableColor; 2] =
        [SerializableColor::black(), SerializableColor::white()];

    /// Current colors, fixed slots first.
    pub fn colors(&self) -> &[SerializableColor] {
        &self.colors
    }

    /// Move `color` to the front of the recent slots.
    ///
    /// Fixed colors are ignored; a color already present is moved rather
    /// than duplicated, and the oldest recent color falls off the end.
    pub fn insert(&mut self, color: SerializableColor) {
        if Self::FIXED.contains(&color) {
            return;
        }
        let mut recent: Vec<SerializableColor> = self.colors[Self::FIXED.len()..]
            .iter()
            .copied()
            .filter(|c| *c != color)
            .collect();
        recent.insert(0, color);
        recent.truncate(Self::SIZE - Self::FIXED.len());
        self.colors.truncate(Self::FIXED.len());
        self.colors.extend(recent);
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        let recent = [
            SerializableColor::new(0xFF, 0x00, 0x00, 0xFF),
            SerializableColor::new(0x00, 0xFF, 0x00, 0xFF),
            SerializableColor::new(0x00, 0x00, 0xFF, 0xFF),
            SerializableColor::new(0xFF, 0xFF, 0x00, 0xFF),
            SerializableColor::new(0xFF, 0x00, 0xFF, 0xFF),
            SerializableColor::new(0xFF, 0xA5, 0x00, 0xFF),
        ];
        Self {
            colors: Self::FIXED.into_iter().chain(recent).collect(),
        }
    }
}

impl TryFrom<Vec<SerializableColor>> for ColorPalette {
    type Error = String;

    fn try_from(saved: Vec<SerializableColor>) -> Result<Self, Self::Error> {
        if saved.len() > Self::SIZE {
            return Err(format!(
                "palette holds at most {} colors, got {}",
                Self::SIZE,
                saved.len()
            ));
        }
        // Replay oldest-first so the saved order survives.
        let mut palette = Self::default();
        for color in saved.into_iter().skip(Self::FIXED.len()).rev() {
            palette.insert(color);
        }
        Ok(palette)
    }
}

impl From<ColorPalette> for Vec<SerializableColor> {
    fn from(palette: ColorPalette) -> Self {
        palette.colors
    }
}
