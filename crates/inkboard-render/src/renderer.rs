//! Renderer trait abstraction.

use crate::surface::Surface;
use inkboard_core::canvas::Canvas;
use peniko::Color;
use thiserror::Error;

/// Dash pattern of the selection decoration, in world units.
pub const SELECTION_DASH: [f32; 2] = [5.0, 5.0];
/// Stroke width of the selection decoration.
pub const SELECTION_STROKE_WIDTH: f64 = 2.0;
/// Dash pattern of shape previews.
pub const PREVIEW_DASH: [f32; 2] = [8.0, 4.0];
/// Opacity factor applied to preview strokes.
pub const PREVIEW_STROKE_ALPHA: f64 = 0.7;
/// Opacity factor applied to preview fills.
pub const PREVIEW_FILL_ALPHA: f64 = 0.3;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Surface allocation failed for {width}x{height}")]
    Surface { width: u32, height: u32 },
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single repaint.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Color the surface is cleared to.
    pub background_color: Color,
    /// Selection decoration color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            selection_color: Color::from_rgba8(0x00, 0x7b, 0xff, 255),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

/// Trait for rendering backends.
///
/// Every call is a full repaint: the surface is cleared and redrawn from
/// the canvas model, so a freshly resized (blank) surface is always valid
/// input.
pub trait Renderer {
    /// Repaint `surface` from `ctx`.
    fn render(&mut self, ctx: &RenderContext, surface: &mut Surface) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
