//! The undoable drawing model: elements in z-order plus the selection.

use crate::shapes::{Element, ElementId};

/// Committed drawing state.
///
/// `elements` is back-to-front: later entries are drawn on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingState {
    pub elements: Vec<Element>,
    selection: Option<ElementId>,
}

impl DrawingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element on top.
    pub fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Remove an element by id, clearing the selection if it pointed there.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.position(id)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        Some(self.elements.remove(index))
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    /// Index of an element in z-order.
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    /// Replace every element, dropping the selection.
    pub fn replace(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.selection = None;
    }

    /// The selected id, if it still names a live element.
    pub fn selection(&self) -> Option<ElementId> {
        self.selection.filter(|id| self.contains(*id))
    }

    /// The selected element, if any.
    pub fn selected(&self) -> Option<&Element> {
        self.selection.and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: Option<ElementId>) {
        self.selection = id;
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ElementStyle, Rectangle};
    use kurbo::Point;

    fn rect() -> Element {
        Element::Rectangle(Rectangle::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            ElementStyle::default(),
        ))
    }

    #[test]
    fn test_add_and_remove() {
        let mut state = DrawingState::new();
        let element = rect();
        let id = element.id();
        state.add(element);
        assert_eq!(state.len(), 1);
        assert!(state.get(id).is_some());

        assert!(state.remove(id).is_some());
        assert!(state.is_empty());
        assert!(state.remove(id).is_none());
    }

    #[test]
    fn test_z_order_is_insertion_order() {
        let mut state = DrawingState::new();
        let a = rect();
        let b = rect();
        let (id_a, id_b) = (a.id(), b.id());
        state.add(a);
        state.add(b);
        assert_eq!(state.position(id_a), Some(0));
        assert_eq!(state.position(id_b), Some(1));
    }

    #[test]
    fn test_dangling_selection_reads_as_none() {
        let mut state = DrawingState::new();
        let element = rect();
        let id = element.id();
        state.add(element);
        state.select(Some(id));
        assert_eq!(state.selection(), Some(id));

        state.elements.clear();
        assert_eq!(state.selection(), None);
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut state = DrawingState::new();
        let element = rect();
        let id = element.id();
        state.add(element);
        state.select(Some(id));
        state.remove(id);
        assert_eq!(state.selection(), None);
    }
}
