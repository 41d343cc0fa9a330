//! Isoceles triangle shape.

use super::{ElementId, ElementStyle, ElementTrait, corner_bounds};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isoceles triangle inscribed in the box spanned by `start` and `end`:
/// the base runs along `end.y`, the apex sits midway across at `start.y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Triangle {
    pub(crate) id: ElementId,
    #[serde(rename = "startPoint")]
    pub start: Point,
    #[serde(rename = "endPoint")]
    pub end: Point,
    /// Style properties.
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Triangle {
    pub fn new(start: Point, end: Point, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    /// Base-left, base-right and apex, in drawing order.
    pub fn vertices(&self) -> [Point; 3] {
        [
            Point::new(self.start.x, self.end.y),
            Point::new(self.end.x, self.end.y),
            Point::new((self.start.x + self.end.x) / 2.0, self.start.y),
        ]
    }
}

impl ElementTrait for Triangle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Option<Rect> {
        corner_bounds(self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        let [a, b, apex] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(apex);
        path.close_path();
        path
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn translate(&mut self, offset: Vec2) {
        self.start += offset;
        self.end += offset;
    }
}
