//! Straight line segment.

use super::{ElementId, ElementStyle, ElementTrait, corner_bounds};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub(crate) id: ElementId,
    #[serde(rename = "startPoint")]
    pub start: Point,
    #[serde(rename = "endPoint")]
    pub end: Point,
    /// Style properties.
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Line {
    pub fn new(start: Point, end: Point, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style,
        }
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl ElementTrait for Line {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Option<Rect> {
        corner_bounds(self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.end);
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
