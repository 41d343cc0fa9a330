//! CPU renderer implementation using tiny-skia.

use crate::renderer::{
    PREVIEW_DASH, PREVIEW_FILL_ALPHA, PREVIEW_STROKE_ALPHA, RenderContext, RenderResult, Renderer,
    SELECTION_DASH, SELECTION_STROKE_WIDTH,
};
use crate::surface::{Surface, to_skia_color};
use inkboard_core::hit_test::selection_bounds;
use inkboard_core::shapes::{Element, ElementStyle, Text};
use inkboard_core::text_metrics::FontMeasurer;
use kurbo::{Affine, BezPath, PathEl, Point, Shape as KurboShape};
use peniko::Color;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

/// Per-draw styling resolved from an element style.
struct DrawStyle<'a> {
    stroke: Color,
    stroke_width: f64,
    fill: Option<Color>,
    dash: Option<&'a [f32]>,
}

impl DrawStyle<'_> {
    /// Committed elements: stroke at full style opacity, fill for closed shapes.
    fn committed(element: &Element) -> Self {
        let style = element.style();
        Self {
            stroke: style.stroke_with_opacity(1.0),
            stroke_width: style.stroke_width,
            fill: if element.is_closed() {
                style.fill_with_opacity(1.0)
            } else {
                None
            },
            dash: None,
        }
    }

    fn preview(element: &Element) -> DrawStyle<'static> {
        let style = element.style();
        DrawStyle {
            stroke: style.stroke_with_opacity(PREVIEW_STROKE_ALPHA),
            stroke_width: style.stroke_width,
            fill: if element.is_closed() {
                style.fill_with_opacity(PREVIEW_FILL_ALPHA)
            } else {
                None
            },
            dash: Some(&PREVIEW_DASH),
        }
    }

    fn stroke_only(style: &ElementStyle) -> DrawStyle<'static> {
        DrawStyle {
            stroke: style.stroke_with_opacity(1.0),
            stroke_width: style.stroke_width,
            fill: None,
            dash: None,
        }
    }
}

/// tiny-skia-based renderer.
#[derive(Debug, Default)]
pub struct SkiaRenderer {
    /// Font for text elements; text is skipped without one.
    font: Option<FontMeasurer>,
    warned_missing_font: bool,
}

impl SkiaRenderer {
    /// Create a new renderer without a font.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer that draws text with `font`.
    pub fn with_font(font: FontMeasurer) -> Self {
        Self {
            font: Some(font),
            warned_missing_font: false,
        }
    }

    fn render_element(&mut self, pixmap: &mut Pixmap, element: &Element, transform: Transform) {
        if element.bounds().is_none() {
            log::debug!("skipping {} {} without geometry", element.type_name(), element.id());
            return;
        }
        match element {
            Element::Text(text) => self.render_text(pixmap, text, transform),
            _ => render_path(pixmap, &element.to_path(), &DrawStyle::committed(element), transform),
        }
    }

    fn render_text(&mut self, pixmap: &mut Pixmap, text: &Text, transform: Transform) {
        let Some(font) = &self.font else {
            if !self.warned_missing_font {
                log::warn!("No font available, text elements will not be drawn");
                self.warned_missing_font = true;
            }
            return;
        };
        let outline = font.outline(&text.content, text.font_size, text.position);
        let Some(path) = to_skia_path(&outline) else {
            return;
        };
        let paint = paint(text.style.stroke_with_opacity(1.0));
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    /// Dashed, translucent rendering of the shape being dragged out.
    fn render_preview(&mut self, pixmap: &mut Pixmap, preview: &Element, transform: Transform) {
        render_path(pixmap, &preview.to_path(), &DrawStyle::preview(preview), transform);
    }

    /// Dashed box around the selected element.
    fn render_selection(
        &mut self,
        pixmap: &mut Pixmap,
        element: &Element,
        color: Color,
        transform: Transform,
    ) {
        let Some(bounds) = selection_bounds(element) else {
            return;
        };
        let style = DrawStyle {
            stroke: color,
            stroke_width: SELECTION_STROKE_WIDTH,
            fill: None,
            dash: Some(&SELECTION_DASH),
        };
        render_path(pixmap, &bounds.to_path(0.1), &style, transform);
    }
}

impl Renderer for SkiaRenderer {
    fn render(&mut self, ctx: &RenderContext, surface: &mut Surface) -> RenderResult<()> {
        let canvas = ctx.canvas;
        surface.clear(self.background_color(ctx));
        let transform = to_skia_transform(canvas.camera().transform());
        let pixmap = surface.pixmap_mut();

        // Committed elements in z-order
        for element in canvas.elements() {
            self.render_element(pixmap, element, transform);
        }

        // Pen stroke in progress, with the live tool style
        if let Some(points) = canvas.stroke_preview() {
            let style = canvas.style().element_style();
            render_path(pixmap, &polyline(points), &DrawStyle::stroke_only(&style), transform);
        }

        // Shape being dragged out
        if let Some(preview) = canvas.shape_preview() {
            self.render_preview(pixmap, &preview, transform);
        }

        if let Some(selected) = canvas.selected() {
            self.render_selection(pixmap, selected, ctx.selection_color, transform);
        }
        Ok(())
    }
}

fn render_path(pixmap: &mut Pixmap, path: &BezPath, style: &DrawStyle, transform: Transform) {
    let Some(path) = to_skia_path(path) else {
        return;
    };

    if let Some(fill) = style.fill {
        pixmap.fill_path(&path, &paint(fill), FillRule::Winding, transform, None);
    }

    let stroke = Stroke {
        width: style.stroke_width as f32,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: style.dash.and_then(|dash| StrokeDash::new(dash.to_vec(), 0.0)),
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint(style.stroke), &stroke, transform, None);
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for point in iter {
            path.line_to(*point);
        }
    }
    path
}

/// Convert a kurbo path. Returns `None` for paths tiny-skia cannot draw
/// (empty, or a lone move-to).
pub(crate) fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(a, b) => builder.quad_to(a.x as f32, a.y as f32, b.x as f32, b.y as f32),
            PathEl::CurveTo(a, b, c) => builder.cubic_to(
                a.x as f32, a.y as f32, b.x as f32, b.y as f32, c.x as f32, c.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// kurbo's `[a b c d e f]` maps onto tiny-skia's row order directly.
pub(crate) fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}
