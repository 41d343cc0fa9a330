//! Point-in-element queries used by selection and the eraser.
//!
//! Containment is approximate: every variant except text is tested against
//! its axis-aligned bounding box grown by [`HIT_MARGIN`]. Circles and
//! triangles therefore answer for their whole start/end box rather than the
//! drawn outline.

use crate::shapes::{Element, ElementId};
use kurbo::{Point, Rect};

/// Extra world units around non-text elements that still count as a hit.
pub const HIT_MARGIN: f64 = 5.0;

/// Padding between an element's bounds and its selection decoration.
pub const SELECTION_PADDING: f64 = 5.0;

/// The region in which a point counts as touching the element.
///
/// Returns `None` for elements without usable geometry; those are never hit.
pub fn hit_region(element: &Element) -> Option<Rect> {
    let bounds = element.bounds()?;
    match element {
        Element::Text(_) => Some(bounds),
        _ => Some(bounds.inflate(HIT_MARGIN, HIT_MARGIN)),
    }
}

/// Check whether `point` touches `element`.
pub fn hit_test(element: &Element, point: Point) -> bool {
    hit_region(element).is_some_and(|region| region_contains(region, point))
}

/// Find the topmost element at a world point.
///
/// Scans from the end of the sequence (drawn last, on top) to the start.
pub fn find_element_at(elements: &[Element], point: Point) -> Option<ElementId> {
    elements
        .iter()
        .rev()
        .find(|element| hit_test(element, point))
        .map(Element::id)
}

/// The dashed box drawn around a selected element.
pub fn selection_bounds(element: &Element) -> Option<Rect> {
    element
        .bounds()
        .map(|bounds| bounds.inflate(SELECTION_PADDING, SELECTION_PADDING))
}

// Edges are inclusive, unlike `Rect::contains`.
fn region_contains(region: Rect, point: Point) -> bool {
    point.x >= region.x0 && point.x <= region.x1 && point.y >= region.y0 && point.y <= region.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, ElementStyle, Pen, Rectangle, Text, Triangle};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Element {
        Element::Rectangle(Rectangle::new(
            Point::new(x0, y0),
            Point::new(x1, y1),
            ElementStyle::default(),
        ))
    }

    #[test]
    fn test_point_inside_rectangle() {
        let elements = vec![rect(0.0, 0.0, 50.0, 30.0)];
        let id = elements[0].id();
        assert_eq!(find_element_at(&elements, Point::new(25.0, 15.0)), Some(id));
    }

    #[test]
    fn test_margin_extends_hit_region() {
        let elements = vec![rect(0.0, 0.0, 50.0, 30.0)];
        assert!(find_element_at(&elements, Point::new(54.0, 15.0)).is_some());
        assert!(find_element_at(&elements, Point::new(55.0, 35.0)).is_some());
        assert!(find_element_at(&elements, Point::new(56.0, 15.0)).is_none());
    }

    #[test]
    fn test_far_point_misses() {
        let elements = vec![rect(0.0, 0.0, 50.0, 30.0), rect(100.0, 100.0, 120.0, 140.0)];
        assert!(find_element_at(&elements, Point::new(500.0, 500.0)).is_none());
        assert!(find_element_at(&[], Point::ZERO).is_none());
    }

    #[test]
    fn test_topmost_wins() {
        let elements = vec![rect(0.0, 0.0, 100.0, 100.0), rect(50.0, 50.0, 150.0, 150.0)];
        let top = elements[1].id();
        let bottom = elements[0].id();
        assert_eq!(find_element_at(&elements, Point::new(75.0, 75.0)), Some(top));
        assert_eq!(find_element_at(&elements, Point::new(20.0, 20.0)), Some(bottom));
    }

    #[test]
    fn test_circle_and_triangle_use_reference_box() {
        // Center (0,0), radius reference (10,10): the disc reaches (-14,0)
        // but the hit region stays on the start/end box.
        let circle = Element::Circle(Circle::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            ElementStyle::default(),
        ));
        assert!(hit_test(&circle, Point::new(8.0, 8.0)));
        assert!(!hit_test(&circle, Point::new(-12.0, 0.0)));

        let triangle = Element::Triangle(Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(40.0, 30.0),
            ElementStyle::default(),
        ));
        // Outside the drawn triangle but inside its box.
        assert!(hit_test(&triangle, Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_text_has_no_margin() {
        let text = Element::Text(Text::new(
            Point::new(10.0, 50.0),
            "label".to_string(),
            16.0,
            (40.0, 16.0),
            ElementStyle::default(),
        ));
        assert!(hit_test(&text, Point::new(30.0, 40.0)));
        assert!(!hit_test(&text, Point::new(30.0, 52.0)));
        assert!(!hit_test(&text, Point::new(8.0, 40.0)));
    }

    #[test]
    fn test_pen_uses_point_bounds() {
        let pen = Element::Pen(Pen::from_points(
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0), Point::new(20.0, 20.0)],
            ElementStyle::default(),
        ));
        assert!(hit_test(&pen, Point::new(12.0, 18.0)));
        assert!(hit_test(&pen, Point::new(6.0, 6.0)));
        assert!(!hit_test(&pen, Point::new(30.0, 30.0)));
    }

    #[test]
    fn test_element_without_geometry_is_skipped() {
        let empty = Element::Pen(Pen::from_points(Vec::new(), ElementStyle::default()));
        let broken = rect(f64::NAN, 0.0, 10.0, 10.0);
        let elements = vec![empty, broken];
        assert!(find_element_at(&elements, Point::new(0.0, 0.0)).is_none());
        // Inside the box the finite coordinates alone would span.
        assert!(find_element_at(&elements, Point::new(10.0, 5.0)).is_none());
        assert!(selection_bounds(&elements[0]).is_none());
        assert!(selection_bounds(&elements[1]).is_none());
    }

    #[test]
    fn test_selection_bounds_padding() {
        let element = rect(0.0, 0.0, 50.0, 30.0);
        assert_eq!(
            selection_bounds(&element).unwrap(),
            Rect::new(-5.0, -5.0, 55.0, 35.0)
        );
    }
}
