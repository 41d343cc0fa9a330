//! The backing store the renderer draws into.

use crate::renderer::{RenderResult, RendererError};
use inkboard_core::camera::Viewport;
use kurbo::Size;
use peniko::Color;
use tiny_skia::Pixmap;

/// A CPU pixel buffer sized to the canvas backing store.
#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocate a transparent surface. Zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let (width, height) = (width.max(1), height.max(1));
        let pixmap = Pixmap::new(width, height).ok_or(RendererError::Surface { width, height })?;
        Ok(Self { pixmap })
    }

    /// Allocate a surface matching the viewport's backing size.
    pub fn for_viewport(viewport: &Viewport) -> RenderResult<Self> {
        let (width, height) = backing_pixels(viewport.backing);
        Self::new(width, height)
    }

    /// Match the viewport's backing size.
    ///
    /// Reallocating discards every pixel, so callers must repaint when this
    /// returns true.
    pub fn resize(&mut self, viewport: &Viewport) -> RenderResult<bool> {
        let (width, height) = backing_pixels(viewport.backing);
        if (width.max(1), height.max(1)) == (self.width(), self.height()) {
            return Ok(false);
        }
        *self = Self::new(width, height)?;
        log::debug!("surface resized to {width}x{height}");
        Ok(true)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width() as f64, self.height() as f64)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(to_skia_color(color));
    }

    /// Straight-alpha RGBA of one pixel, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }
}

/// Convert a peniko color to a tiny-skia color.
pub(crate) fn to_skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

fn backing_pixels(size: Size) -> (u32, u32) {
    let dim = |v: f64| {
        if v.is_finite() && v > 0.0 {
            v.round() as u32
        } else {
            1
        }
    };
    (dim(size.width), dim(size.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_bumped() {
        let surface = Surface::new(0, 0).unwrap();
        assert_eq!((surface.width(), surface.height()), (1, 1));
    }

    #[test]
    fn test_resize_reallocates_and_clears() {
        let mut surface = Surface::for_viewport(&Viewport::uniform(40.0, 30.0)).unwrap();
        surface.clear(Color::from_rgba8(255, 0, 0, 255));
        assert_eq!(surface.pixel(5, 5), Some([255, 0, 0, 255]));

        assert!(!surface.resize(&Viewport::uniform(40.0, 30.0)).unwrap());
        assert_eq!(surface.pixel(5, 5), Some([255, 0, 0, 255]));

        assert!(surface.resize(&Viewport::uniform(80.0, 60.0)).unwrap());
        assert_eq!((surface.width(), surface.height()), (80, 60));
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_backing_size_drives_pixels() {
        let viewport = Viewport {
            backing: Size::new(200.0, 100.0),
            displayed: Size::new(100.0, 50.0),
        };
        let surface = Surface::for_viewport(&viewport).unwrap();
        assert_eq!((surface.width(), surface.height()), (200, 100));
        assert!(surface.pixel(200, 0).is_none());
    }

    #[test]
    fn test_pixel_past_row_end_does_not_wrap() {
        let mut surface = Surface::new(4, 3).unwrap();
        surface.clear(Color::from_rgba8(0, 255, 0, 255));
        assert_eq!(surface.pixel(3, 0), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(surface.pixel(4, 1), None);
        assert_eq!(surface.pixel(0, 3), None);
    }
}
