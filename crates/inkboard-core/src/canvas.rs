//! Whiteboard engine: pointer and keyboard handling, selection, dragging
//! and history.

use crate::camera::{Camera, Viewport};
use crate::config::Settings;
use crate::document::DrawingState;
use crate::hit_test::find_element_at;
use crate::history::History;
use crate::input::{KeyEvent, PointerEvent, ShortcutAction};
use crate::shapes::{Element, ElementId, Geometry, Pen, SerializableColor, Text};
use crate::text_metrics::{FallbackMeasurer, TextMeasurer};
use crate::tools::{self, ColorPalette, ToolKind, ToolStyle};
use kurbo::{Point, Vec2};
use std::fmt;

/// Offset applied to both axes of a duplicated element.
pub const DUPLICATE_OFFSET: f64 = 10.0;

/// The pointer gesture in progress. Never recorded in history.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Freehand stroke being drawn.
    Stroke { points: Vec<Point> },
    /// Two-point shape being dragged out. `current` is set on the first move.
    Shape {
        tool: ToolKind,
        start: Point,
        current: Option<Point>,
    },
    /// Eraser held down; `removed` counts removals not yet committed.
    Erasing { removed: usize },
    /// The selected element is being moved. `original` is its geometry at
    /// drag start, so every move places it at `original + (point - anchor)`.
    Dragging {
        id: ElementId,
        anchor: Point,
        original: Geometry,
    },
}

/// Where the pending text input is anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPopup {
    pub world: Point,
    pub screen: Point,
}

/// Readout for the surrounding chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub tool: ToolKind,
    pub element_count: usize,
    pub has_selection: bool,
    pub zoom_percent: u32,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} · {} elements · {} · {}%",
            self.tool,
            self.element_count,
            if self.has_selection { "selected" } else { "none" },
            self.zoom_percent
        )
    }
}

/// Runtime whiteboard state.
pub struct Canvas {
    drawing: DrawingState,
    history: History,
    camera: Camera,
    viewport: Viewport,
    tool: ToolKind,
    style: ToolStyle,
    palette: ColorPalette,
    gesture: Gesture,
    text_popup: Option<TextPopup>,
    measurer: Box<dyn TextMeasurer>,
    /// Set whenever something visible changed since the last repaint.
    dirty: bool,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("drawing", &self.drawing)
            .field("history_index", &self.history.index())
            .field("camera", &self.camera)
            .field("viewport", &self.viewport)
            .field("tool", &self.tool)
            .field("style", &self.style)
            .field("gesture", &self.gesture)
            .field("text_popup", &self.text_popup)
            .finish_non_exhaustive()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with default settings.
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            drawing: DrawingState::new(),
            history: History::with_limit(settings.history_limit),
            camera: Camera::with_zoom(settings.zoom),
            viewport: Viewport::default(),
            tool: settings.tool,
            style: settings.style.clone().clamped(),
            palette: settings.palette.clone(),
            gesture: Gesture::Idle,
            text_popup: None,
            measurer: Box::new(FallbackMeasurer),
            dirty: true,
        }
    }

    /// Use `measurer` to size new text elements.
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn elements(&self) -> &[Element] {
        &self.drawing.elements
    }

    pub fn drawing(&self) -> &DrawingState {
        &self.drawing
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn style(&self) -> &ToolStyle {
        &self.style
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn text_popup(&self) -> Option<TextPopup> {
        self.text_popup
    }

    pub fn selection(&self) -> Option<ElementId> {
        self.drawing.selection()
    }

    pub fn selected(&self) -> Option<&Element> {
        self.drawing.selected()
    }

    /// Whether a repaint is due.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the repaint flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn to_world(&self, screen: Point) -> Point {
        self.camera.screen_to_world(screen, &self.viewport)
    }

    pub fn to_screen(&self, world: Point) -> Point {
        self.camera.world_to_screen(world, &self.viewport)
    }

    pub fn status(&self) -> Status {
        Status {
            tool: self.tool,
            element_count: self.drawing.len(),
            has_selection: self.drawing.selection().is_some(),
            zoom_percent: self.camera.zoom_percent(),
        }
    }

    /// Points of the freehand stroke in progress.
    pub fn stroke_preview(&self) -> Option<&[Point]> {
        match &self.gesture {
            Gesture::Stroke { points } => Some(points),
            _ => None,
        }
    }

    /// The element the shape gesture in progress would create.
    pub fn shape_preview(&self) -> Option<Element> {
        match &self.gesture {
            Gesture::Shape {
                tool,
                start,
                current: Some(current),
            } => tools::shape_from_drag(*tool, *start, *current, &self.style),
            _ => None,
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    /// Start a gesture with the active tool.
    pub fn pointer_down(&mut self, screen: Point) {
        let point = self.to_world(screen);
        match self.tool {
            ToolKind::Select => {
                let hit = find_element_at(&self.drawing.elements, point);
                let drag = hit
                    .filter(|id| Some(*id) == self.drawing.selection())
                    .and_then(|id| self.drawing.get(id))
                    .map(|element| Gesture::Dragging {
                        id: element.id(),
                        anchor: point,
                        original: element.geometry(),
                    });
                match drag {
                    Some(gesture) => {
                        log::debug!("drag start at {point:?}");
                        self.gesture = gesture;
                    }
                    None => self.drawing.select(hit),
                }
            }
            ToolKind::Pen => {
                self.gesture = Gesture::Stroke {
                    points: vec![point],
                };
            }
            ToolKind::Eraser => {
                if let Some(id) = find_element_at(&self.drawing.elements, point) {
                    self.drawing.remove(id);
                    self.commit();
                }
                self.gesture = Gesture::Erasing { removed: 0 };
            }
            ToolKind::Text => {
                self.text_popup = Some(TextPopup {
                    world: point,
                    screen: self.to_screen(point),
                });
            }
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Triangle | ToolKind::Line => {
                self.gesture = Gesture::Shape {
                    tool: self.tool,
                    start: point,
                    current: None,
                };
            }
        }
        self.dirty = true;
    }

    /// Advance the gesture in progress. Does nothing when idle.
    pub fn pointer_move(&mut self, screen: Point) {
        let point = self.to_world(screen);
        match &mut self.gesture {
            Gesture::Idle => return,
            Gesture::Dragging {
                id,
                anchor,
                original,
            } => {
                let offset = point - *anchor;
                if let Some(element) = self.drawing.get_mut(*id) {
                    element.place_from(original, offset);
                }
            }
            Gesture::Stroke { points } => points.push(point),
            Gesture::Erasing { removed } => {
                match find_element_at(&self.drawing.elements, point) {
                    Some(id) => {
                        self.drawing.remove(id);
                        *removed += 1;
                    }
                    None => return,
                }
            }
            Gesture::Shape { current, .. } => *current = Some(point),
        }
        self.dirty = true;
    }

    /// Finish the gesture in progress, creating or committing as needed.
    pub fn pointer_up(&mut self, screen: Point) {
        let point = self.to_world(screen);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => return,
            Gesture::Dragging { id, .. } => {
                if !self.drawing.contains(id) {
                    log::debug!("drag end on missing {id}, ignored");
                    return;
                }
                log::debug!("drag end on {id}");
                self.commit();
            }
            Gesture::Stroke { points } => {
                if points.len() >= 2 {
                    let pen = Pen::from_points(points, self.style.element_style());
                    self.add_and_commit(Element::Pen(pen));
                }
            }
            Gesture::Shape { tool, start, .. } => {
                if let Some(element) = tools::shape_from_drag(tool, start, point, &self.style) {
                    self.add_and_commit(element);
                }
            }
            Gesture::Erasing { removed } => {
                if removed > 0 {
                    self.commit();
                }
            }
        }
        self.dirty = true;
    }

    /// Create a text element from the open popup.
    ///
    /// The text is trimmed; empty text just closes the popup. Returns the
    /// new element's id.
    pub fn submit_text(&mut self, text: &str) -> Option<ElementId> {
        let popup = self.text_popup.take()?;
        self.dirty = true;
        let content = text.trim();
        if content.is_empty() {
            return None;
        }
        let font_size = self.style.font_size;
        let metrics = self.measurer.measure(content, font_size);
        let element = Element::Text(Text::new(
            popup.world,
            content.to_string(),
            font_size,
            metrics,
            self.style.text_style(),
        ));
        let id = element.id();
        self.add_and_commit(element);
        Some(id)
    }

    /// Close the text popup without creating anything.
    pub fn cancel_text(&mut self) -> bool {
        let was_open = self.text_popup.take().is_some();
        self.dirty |= was_open;
        was_open
    }

    /// Run the shortcut bound to `event`.
    ///
    /// While the text popup is open only Escape is honoured. Returns the
    /// action taken, if any.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<ShortcutAction> {
        let action = ShortcutAction::from_key(event)?;
        if self.text_popup.is_some() {
            return match action {
                ShortcutAction::CancelText => {
                    self.cancel_text();
                    Some(action)
                }
                _ => None,
            };
        }
        let handled = match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Duplicate => self.duplicate_selected().is_some(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::CancelText => false,
        };
        handled.then_some(action)
    }

    /// Copy the selected element with a fixed offset and select the copy.
    ///
    /// A drag in progress is rolled back first, so the copy is taken from
    /// the last committed geometry.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        self.drawing.selection()?;
        self.abandon_gesture();
        let mut copy = self.drawing.selected()?.clone();
        copy.regenerate_id();
        copy.translate(Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET));
        let id = copy.id();
        self.add_and_commit(copy);
        self.drawing.select(Some(id));
        Some(id)
    }

    /// Remove the selected element.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.drawing.selection() else {
            return false;
        };
        self.abandon_gesture();
        self.drawing.remove(id);
        self.drawing.clear_selection();
        self.commit();
        self.dirty = true;
        true
    }

    /// Step back one history entry. Clears the selection.
    pub fn undo(&mut self) -> bool {
        self.abandon_gesture();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.drawing.replace(snapshot.to_vec());
        self.dirty = true;
        true
    }

    /// Step forward one history entry. Clears the selection.
    pub fn redo(&mut self) -> bool {
        self.abandon_gesture();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.drawing.replace(snapshot.to_vec());
        self.dirty = true;
        true
    }

    /// Remove every element, as one undoable commit.
    pub fn clear(&mut self) {
        self.abandon_gesture();
        self.drawing.replace(Vec::new());
        self.commit();
        self.dirty = true;
    }

    /// Switch tools. Any gesture in progress is dropped; an open text popup
    /// stays open.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.abandon_gesture();
        self.tool = tool;
        self.dirty = true;
    }

    /// Set the stroke color and record it in the palette.
    pub fn set_color(&mut self, color: SerializableColor) {
        self.style.color = color;
        self.palette.insert(color);
        self.dirty = true;
    }

    /// Set the fill color; `None` is transparent.
    pub fn set_fill(&mut self, fill: Option<SerializableColor>) {
        self.style.fill_color = fill;
        self.dirty = true;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.style.stroke_width = tools::clamp_stroke_width(width);
        self.dirty = true;
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.style.opacity = tools::clamp_opacity(opacity);
        self.dirty = true;
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.style.font_size = tools::clamp_font_size(size);
        self.dirty = true;
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.camera.zoom_in();
        self.dirty |= changed;
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.camera.zoom_out();
        self.dirty |= changed;
        changed
    }

    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let changed = self.camera.set_zoom(zoom);
        self.dirty |= changed;
        changed
    }

    /// The canvas box was resized; the backing store follows the displayed
    /// size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.set_viewport(Viewport::uniform(width, height));
    }

    /// Set backing and displayed sizes independently (HiDPI, CSS scaling).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.dirty = true;
    }

    fn add_and_commit(&mut self, element: Element) {
        log::debug!("add {} {}", element.type_name(), element.id());
        self.drawing.add(element);
        self.commit();
    }

    fn commit(&mut self) {
        self.history.commit(&self.drawing.elements);
    }

    /// Drop the gesture in progress, discarding its uncommitted edits.
    fn abandon_gesture(&mut self) {
        let gesture = std::mem::take(&mut self.gesture);
        let uncommitted = match &gesture {
            Gesture::Dragging { .. } => true,
            Gesture::Erasing { removed } => *removed > 0,
            _ => false,
        };
        if uncommitted {
            let selection = self.drawing.selection();
            self.drawing.replace(self.history.current().to_vec());
            self.drawing.select(selection);
        }
        if gesture != Gesture::Idle {
            log::debug!("gesture abandoned");
            self.dirty = true;
        }
    }
}
