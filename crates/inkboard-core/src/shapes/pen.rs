//! Freehand pen stroke.

use super::{ElementId, ElementStyle, ElementTrait, is_finite_point};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke rendered as a polyline through its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pen {
    pub(crate) id: ElementId,
    /// Points in the stroke, in drawing order.
    pub points: Vec<Point>,
    /// Style properties.
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Pen {
    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            style,
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ElementTrait for Pen {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Option<Rect> {
        let first = *self.points.first()?;
        if !self.points.iter().all(|p| is_finite_point(*p)) {
            return None;
        }
        let rect = self
            .points
            .iter()
            .skip(1)
            .fold(Rect::from_points(first, first), |acc, p| acc.union_pt(*p));
        Some(rect)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        path.move_to(*first);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }
        path
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn translate(&mut self, offset: Vec2) {
        for point in &mut self.points {
            *point += offset;
        }
    }
}
