//! Drawable element definitions for the whiteboard.

mod circle;
mod line;
mod pen;
mod rectangle;
mod text;
mod triangle;

pub use circle::Circle;
pub use line::Line;
pub use pen::Pen;
pub use rectangle::Rectangle;
pub use text::Text;
pub use triangle::Triangle;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Sentinel accepted wherever a fill color is expected, meaning "no fill".
pub const TRANSPARENT: &str = "transparent";

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),
    #[error("unsupported color length in {0} (expected #rgb, #rrggbb or #rrggbbaa)")]
    BadLength(String),
    #[error("invalid hex digits in {0}")]
    BadDigits(String),
    #[error("'transparent' is only valid as a fill color")]
    TransparentStroke,
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Result<Self, ColorParseError> {
        let trimmed = color.trim();
        if trimmed.eq_ignore_ascii_case(TRANSPARENT) {
            return Err(ColorParseError::TransparentStroke);
        }
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(color.to_string()))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigits(color.to_string()));
        }
        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ColorParseError::BadDigits(color.to_string()))
        };
        match hex.len() {
            3 => Ok(Self::new(
                byte(0..1)? * 17,
                byte(1..2)? * 17,
                byte(2..3)? * 17,
                255,
            )),
            6 => Ok(Self::new(byte(0..2)?, byte(2..4)?, byte(4..6)?, 255)),
            8 => Ok(Self::new(byte(0..2)?, byte(2..4)?, byte(4..6)?, byte(6..8)?)),
            _ => Err(ColorParseError::BadLength(color.to_string())),
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for SerializableColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Parse a fill color, accepting the `transparent` sentinel as "no fill".
pub fn parse_fill(fill: &str) -> Result<Option<SerializableColor>, ColorParseError> {
    if fill.trim().eq_ignore_ascii_case(TRANSPARENT) {
        Ok(None)
    } else {
        SerializableColor::from_hex(fill).map(Some)
    }
}

/// Format a fill color, using the `transparent` sentinel for "no fill".
pub fn format_fill(fill: Option<SerializableColor>) -> String {
    fill.map(|c| c.to_hex()).unwrap_or_else(|| TRANSPARENT.to_string())
}

/// Style properties shared by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    /// Stroke color.
    pub color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = transparent).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            opacity: 1.0,
        }
    }
}

impl ElementStyle {
    /// Get the stroke color with `opacity * factor` applied.
    pub fn stroke_with_opacity(&self, factor: f64) -> Color {
        apply_alpha(self.color, self.opacity * factor)
    }

    /// Get the fill color with `opacity * factor` applied.
    pub fn fill_with_opacity(&self, factor: f64) -> Option<Color> {
        self.fill_color.map(|c| apply_alpha(c, self.opacity * factor))
    }
}

fn apply_alpha(color: SerializableColor, opacity: f64) -> Color {
    let alpha = (color.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

/// A snapshot of an element's geometry, used to translate it from a fixed
/// origin while it is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Text baseline anchor.
    Anchor(Point),
    /// Freehand stroke points.
    Points(Vec<Point>),
    /// Two-point shapes.
    Segment { start: Point, end: Point },
}

/// Common trait for all elements.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Axis-aligned bounding box in world coordinates, or `None` when the
    /// element lacks the geometry it needs.
    fn bounds(&self) -> Option<Rect>;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ElementStyle;

    /// Move the element by a world-space offset.
    fn translate(&mut self, offset: Vec2);
}

/// Closed set of drawable elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Pen(Pen),
    Rectangle(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
    Line(Line),
    Text(Text),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Pen(e) => e.id(),
            Element::Rectangle(e) => e.id(),
            Element::Circle(e) => e.id(),
            Element::Triangle(e) => e.id(),
            Element::Line(e) => e.id(),
            Element::Text(e) => e.id(),
        }
    }

    /// Name of the variant, matching the serialized `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Pen(_) => "pen",
            Element::Rectangle(_) => "rectangle",
            Element::Circle(_) => "circle",
            Element::Triangle(_) => "triangle",
            Element::Line(_) => "line",
            Element::Text(_) => "text",
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Element::Pen(e) => e.bounds(),
            Element::Rectangle(e) => e.bounds(),
            Element::Circle(e) => e.bounds(),
            Element::Triangle(e) => e.bounds(),
            Element::Line(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Element::Pen(e) => e.to_path(),
            Element::Rectangle(e) => e.to_path(),
            Element::Circle(e) => e.to_path(),
            Element::Triangle(e) => e.to_path(),
            Element::Line(e) => e.to_path(),
            Element::Text(e) => e.to_path(),
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Pen(e) => e.style(),
            Element::Rectangle(e) => e.style(),
            Element::Circle(e) => e.style(),
            Element::Triangle(e) => e.style(),
            Element::Line(e) => e.style(),
            Element::Text(e) => e.style(),
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Element::Pen(e) => e.translate(offset),
            Element::Rectangle(e) => e.translate(offset),
            Element::Circle(e) => e.translate(offset),
            Element::Triangle(e) => e.translate(offset),
            Element::Line(e) => e.translate(offset),
            Element::Text(e) => e.translate(offset),
        }
    }

    /// Whether the variant renders its fill color.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Element::Rectangle(_) | Element::Circle(_) | Element::Triangle(_)
        )
    }

    /// Capture the current geometry.
    pub fn geometry(&self) -> Geometry {
        match self {
            Element::Pen(e) => Geometry::Points(e.points.clone()),
            Element::Text(e) => Geometry::Anchor(e.position),
            Element::Rectangle(Rectangle { start, end, .. })
            | Element::Circle(Circle { start, end, .. })
            | Element::Triangle(Triangle { start, end, .. })
            | Element::Line(Line { start, end, .. }) => Geometry::Segment {
                start: *start,
                end: *end,
            },
        }
    }

    /// Replace the geometry with `origin` translated by `offset`.
    ///
    /// Returns false (and leaves the element untouched) when `origin` was
    /// captured from a different variant.
    pub fn place_from(&mut self, origin: &Geometry, offset: Vec2) -> bool {
        match (self, origin) {
            (Element::Text(e), Geometry::Anchor(anchor)) => {
                e.position = *anchor + offset;
                true
            }
            (Element::Pen(e), Geometry::Points(points)) => {
                e.points = points.iter().map(|p| *p + offset).collect();
                true
            }
            (
                Element::Rectangle(Rectangle { start, end, .. })
                | Element::Circle(Circle { start, end, .. })
                | Element::Triangle(Triangle { start, end, .. })
                | Element::Line(Line { start, end, .. }),
                Geometry::Segment {
                    start: origin_start,
                    end: origin_end,
                },
            ) => {
                *start = *origin_start + offset;
                *end = *origin_end + offset;
                true
            }
            _ => false,
        }
    }

    /// Regenerate the element's ID with a new unique identifier.
    /// Used when duplicating so the copy never shares the original's ID.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Pen(e) => e.id = new_id,
            Element::Rectangle(e) => e.id = new_id,
            Element::Circle(e) => e.id = new_id,
            Element::Triangle(e) => e.id = new_id,
            Element::Line(e) => e.id = new_id,
            Element::Text(e) => e.id = new_id,
        }
    }
}

/// Bounding box of two corner points.
pub(crate) fn corner_bounds(start: Point, end: Point) -> Option<Rect> {
    // `Rect::from_points` takes min/max, which would swallow a NaN corner.
    (is_finite_point(start) && is_finite_point(end)).then(|| Rect::from_points(start, end))
}

pub(crate) fn is_finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

pub(crate) fn is_finite_rect(rect: Rect) -> bool {
    rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()
}
