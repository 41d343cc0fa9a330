//! Circle shape.

use super::{ElementId, ElementStyle, ElementTrait, corner_bounds};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle centred on `start` whose radius reaches `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub(crate) id: ElementId,
    /// Center of the circle.
    #[serde(rename = "startPoint")]
    pub start: Point,
    /// Any point on the circumference.
    #[serde(rename = "endPoint")]
    pub end: Point,
    /// Style properties.
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Circle {
    pub fn new(start: Point, end: Point, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    /// Distance from the center to the radius reference point.
    pub fn radius(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl ElementTrait for Circle {
    fn id(&self) -> ElementId {
        self.id
    }

    /// The box spanned by center and radius reference, not the drawn disc.
    /// Selection only needs to be close enough.
    fn bounds(&self) -> Option<Rect> {
        corner_bounds(self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        kurbo::Circle::new(self.start, self.radius()).to_path(0.1)
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
    fn test_radius() {
        let circle = Circle::new(
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            ElementStyle::default(),
        );
        assert!((circle.radius() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_use_reference_points() {
        let circle = Circle::new(
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            ElementStyle::default(),
        );
        let bounds = circle.bounds().unwrap();
        assert_eq!(bounds, Rect::new(10.0, 10.0, 20.0, 10.0));
    }
}
