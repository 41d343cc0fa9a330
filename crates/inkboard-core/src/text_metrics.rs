//! Text measurement and glyph outlines for text elements.

use crate::shapes::Text;
use ab_glyph::{Font, FontArc, GlyphId, OutlineCurve, PxScale, ScaleFont};
use kurbo::{BezPath, Point};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fonts tried, in order, when no font path is configured.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Errors that can occur while loading a font.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid font data")]
    Invalid(#[from] ab_glyph::InvalidFont),
}

/// Measures a string's layout box at a font size.
pub trait TextMeasurer {
    /// Returns `(width, height)` in world units.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Used when no font is available: a fixed width and a height equal to the
/// font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackMeasurer;

impl TextMeasurer for FallbackMeasurer {
    fn measure(&self, _text: &str, font_size: f64) -> (f64, f64) {
        (Text::FALLBACK_WIDTH, font_size)
    }
}

/// Measures and outlines text with a real font.
#[derive(Clone)]
pub struct FontMeasurer {
    font: FontArc,
}

impl std::fmt::Debug for FontMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMeasurer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl FontMeasurer {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        Ok(Self {
            font: FontArc::try_from_vec(data)?,
        })
    }

    /// Load a TrueType/OpenType font file.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data)
    }

    /// Load `preferred` if given, else the first usable system candidate.
    pub fn discover(preferred: Option<&Path>) -> Option<Self> {
        if let Some(path) = preferred {
            match Self::load(path) {
                Ok(font) => return Some(font),
                Err(e) => log::warn!("{e}; falling back to system fonts"),
            }
        }
        SYSTEM_FONT_CANDIDATES.iter().find_map(|candidate| {
            let path = Path::new(candidate);
            if !path.exists() {
                return None;
            }
            match Self::load(path) {
                Ok(font) => {
                    log::info!("Using font {}", path.display());
                    Some(font)
                }
                Err(e) => {
                    log::warn!("{e}");
                    None
                }
            }
        })
    }

    /// Lay out `text` on a single line, yielding each glyph with its pen x.
    fn layout(&self, text: &str, font_size: f64) -> Vec<(GlyphId, f32)> {
        let scaled = self.font.as_scaled(PxScale::from(font_size as f32));
        let mut pen_x = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());
        for c in text.chars() {
            let id = self.font.glyph_id(c);
            if let Some(prev) = prev {
                pen_x += scaled.kern(prev, id);
            }
            glyphs.push((id, pen_x));
            pen_x += scaled.h_advance(id);
            prev = Some(id);
        }
        glyphs
    }

    fn advance_width(&self, text: &str, font_size: f64) -> f64 {
        let scaled = self.font.as_scaled(PxScale::from(font_size as f32));
        self.layout(text, font_size)
            .last()
            .map(|(id, x)| (x + scaled.h_advance(*id)) as f64)
            .unwrap_or(0.0)
    }

    /// Glyph outlines for `text` with the baseline starting at `origin`,
    /// in the same coordinate space as `origin` (y down).
    pub fn outline(&self, text: &str, font_size: f64, origin: Point) -> BezPath {
        let scaled = self.font.as_scaled(PxScale::from(font_size as f32));
        let (sx, sy) = (scaled.h_scale_factor() as f64, scaled.v_scale_factor() as f64);
        let mut path = BezPath::new();

        for (id, pen_x) in self.layout(text, font_size) {
            let Some(outline) = self.font.outline(id) else {
                continue;
            };
            let base_x = origin.x + pen_x as f64;
            // Font units are y-up.
            let map = |p: ab_glyph::Point| {
                Point::new(base_x + p.x as f64 * sx, origin.y - p.y as f64 * sy)
            };
            let mut last: Option<Point> = None;
            for curve in &outline.curves {
                let (start, end) = match curve {
                    OutlineCurve::Line(a, b) => (map(*a), map(*b)),
                    OutlineCurve::Quad(a, _, c) => (map(*a), map(*c)),
                    OutlineCurve::Cubic(a, _, _, d) => (map(*a), map(*d)),
                };
                if last != Some(start) {
                    if last.is_some() {
                        path.close_path();
                    }
                    path.move_to(start);
                }
                match curve {
                    OutlineCurve::Line(_, _) => path.line_to(end),
                    OutlineCurve::Quad(_, b, _) => path.quad_to(map(*b), end),
                    OutlineCurve::Cubic(_, b, c, _) => path.curve_to(map(*b), map(*c), end),
                }
                last = Some(end);
            }
            if last.is_some() {
                path.close_path();
            }
        }
        path
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        (self.advance_width(text, font_size), font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_metrics() {
        let (w, h) = FallbackMeasurer.measure("anything", 24.0);
        assert!((w - Text::FALLBACK_WIDTH).abs() < f64::EPSILON);
        assert!((h - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(matches!(
            FontMeasurer::from_bytes(vec![0, 1, 2, 3]),
            Err(FontError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_font_file() {
        let err = FontMeasurer::load(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }

    #[test]
    fn test_system_font_measures_proportionally() {
        // Only meaningful where a system font is installed.
        let Some(font) = FontMeasurer::discover(None) else {
            return;
        };
        let (short, h) = font.measure("ab", 16.0);
        let (long, _) = font.measure("abab", 16.0);
        let (big, _) = font.measure("ab", 32.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert!((big - short * 2.0).abs() < 0.5);
        assert!((h - 16.0).abs() < f64::EPSILON);

        let path = font.outline("ab", 16.0, Point::new(10.0, 50.0));
        let bounds = kurbo::Shape::bounding_box(&path);
        assert!(bounds.y1 <= 50.5);
        assert!(bounds.x0 >= 9.0);
    }
}
