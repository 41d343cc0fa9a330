//! Rectangle shape.

use super::{ElementId, ElementStyle, ElementTrait, corner_bounds};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned box spanned by two opposite corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub(crate) id: ElementId,
    /// Corner where the gesture started.
    #[serde(rename = "startPoint")]
    pub start: Point,
    /// Corner where the gesture ended.
    #[serde(rename = "endPoint")]
    pub end: Point,
    /// Style properties.
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Rectangle {
    /// Create a rectangle from two corner points.
    pub fn new(start: Point, end: Point, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    /// Get the rectangle as a kurbo Rect (normalized).
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

impl ElementTrait for Rectangle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Option<Rect> {
        corner_bounds(self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn translate(&mut self, offset: Vec2) {
        self.start += offset;
        self.end += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_normalizes_corners() {
        let rect = Rectangle::new(
            Point::new(100.0, 100.0),
            Point::new(50.0, 20.0),
            ElementStyle::default(),
        );
        let bounds = rect.bounds().unwrap();
        assert!((bounds.x0 - 50.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_corner_has_no_bounds() {
        let rect = Rectangle::new(
            Point::new(f64::NAN, 0.0),
            Point::new(10.0, 10.0),
            ElementStyle::default(),
        );
        assert!(rect.bounds().is_none());
    }
}
