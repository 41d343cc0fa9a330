//! Camera module for zoom/pan transforms between screen and world space.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;
/// Zoom change applied by a single zoom-in/zoom-out command.
pub const ZOOM_STEP: f64 = 0.1;

/// The canvas box as seen by two parties: the backing store that is drawn
/// into, and the box the pointer reports coordinates against.
///
/// When the two differ (CSS scaling, HiDPI) pointer coordinates have to be
/// stretched by `backing / displayed` before the camera transform applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Size of the backing surface in pixels.
    pub backing: Size,
    /// Displayed size of the canvas box.
    pub displayed: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::uniform(800.0, 600.0)
    }
}

impl Viewport {
    /// A viewport whose backing store matches its displayed size.
    pub fn uniform(width: f64, height: f64) -> Self {
        let size = Size::new(width, height);
        Self {
            backing: size,
            displayed: size,
        }
    }

    /// Per-axis factor from displayed pixels to backing pixels.
    pub fn scale_factors(&self) -> Vec2 {
        let sx = if self.displayed.width > 0.0 {
            self.backing.width / self.displayed.width
        } else {
            1.0
        };
        let sy = if self.displayed.height > 0.0 {
            self.backing.height / self.displayed.height
        } else {
            1.0
        };
        Vec2::new(sx, sy)
    }
}

/// Camera manages the view transform for the canvas.
///
/// World coordinates map to backing pixels as `world * zoom + offset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in backing pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera at the given zoom, clamped into range.
    pub fn with_zoom(zoom: f64) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Get the affine transform for rendering (world -> backing pixels).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a pointer position to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point, viewport: &Viewport) -> Point {
        to_world(screen_point, self.zoom, self.offset, viewport)
    }

    /// Convert a world position to pointer (displayed) coordinates.
    pub fn world_to_screen(&self, world_point: Point, viewport: &Viewport) -> Point {
        to_screen(world_point, self.zoom, self.offset, viewport)
    }

    /// Step the zoom in by [`ZOOM_STEP`]. Returns true if the zoom changed.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    /// Step the zoom out by [`ZOOM_STEP`]. Returns true if the zoom changed.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    /// Set the zoom level, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let new_zoom = clamp_zoom(zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = new_zoom;
        true
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Pan the camera by a delta in backing pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }
}

/// Clamp a zoom value into the supported range.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    // Round away the float noise that repeated 0.1 steps accumulate.
    let rounded = (zoom * 1e9).round() / 1e9;
    rounded.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Convert a pointer position (relative to the displayed canvas box) into
/// world coordinates.
pub fn to_world(screen: Point, zoom: f64, offset: Vec2, viewport: &Viewport) -> Point {
    let scale = viewport.scale_factors();
    Point::new(
        (screen.x * scale.x - offset.x) / zoom,
        (screen.y * scale.y - offset.y) / zoom,
    )
}

/// Convert a world position back into pointer (displayed) coordinates.
pub fn to_screen(world: Point, zoom: f64, offset: Vec2, viewport: &Viewport) -> Point {
    let scale = viewport.scale_factors();
    Point::new(
        (world.x * zoom + offset.x) / scale.x,
        (world.y * zoom + offset.y) / scale.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_identity() {
        let camera = Camera::new();
        let viewport = Viewport::default();
        let screen = Point::new(100.0, 200.0);
        let world = camera.screen_to_world(screen, &viewport);
        assert!((world.x - screen.x).abs() < f64::EPSILON);
        assert!((world.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_zoom() {
        let camera = Camera::with_zoom(2.0);
        let world = camera.screen_to_world(Point::new(100.0, 200.0), &Viewport::default());
        assert!((world.x - 50.0).abs() < 1e-9);
        assert!((world.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_screen_to_world_corrects_display_scaling() {
        // Backing store twice as large as the displayed box (HiDPI).
        let viewport = Viewport {
            backing: Size::new(1600.0, 1200.0),
            displayed: Size::new(800.0, 600.0),
        };
        let camera = Camera::new();
        let world = camera.screen_to_world(Point::new(10.0, 20.0), &viewport);
        assert!((world.x - 20.0).abs() < 1e-9);
        assert!((world.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let viewport = Viewport {
            backing: Size::new(1024.0, 700.0),
            displayed: Size::new(800.0, 600.0),
        };
        let offset = Vec2::new(30.0, -20.0);
        let mut zoom = MIN_ZOOM;
        while zoom <= MAX_ZOOM {
            for original in [
                Point::new(0.0, 0.0),
                Point::new(123.0, 456.0),
                Point::new(-75.5, 3.25),
                Point::new(799.0, 599.0),
            ] {
                let world = to_world(original, zoom, offset, &viewport);
                let back = to_screen(world, zoom, offset, &viewport);
                assert!((back.x - original.x).abs() < 1e-9);
                assert!((back.y - original.y).abs() < 1e-9);
            }
            zoom += 0.35;
        }
    }

    #[test]
    fn test_zoom_steps_and_clamp() {
        let mut camera = Camera::new();
        assert!(camera.zoom_in());
        assert_eq!(camera.zoom_percent(), 110);

        for _ in 0..100 {
            camera.zoom_in();
        }
        assert!((camera.zoom - MAX_ZOOM).abs() < f64::EPSILON);
        assert!(!camera.zoom_in());

        for _ in 0..100 {
            camera.zoom_out();
        }
        assert!((camera.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        assert_eq!(camera.zoom_percent(), 10);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 20.0).abs() < f64::EPSILON);
    }
}
