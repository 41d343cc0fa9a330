//! Export of the rendered surface to PNG and PDF files.
//!
//! Export reads pixels only. Rasterization, document writing and delivery
//! are separate capabilities so each can be swapped out independently.

use crate::surface::Surface;
use chrono::{DateTime, Utc};
use inkboard_core::config::{ExportSettings, MIN_DOCUMENT_SCALE};
use inkboard_core::shapes::SerializableColor;
use kurbo::Size;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// File name of exported documents.
pub const DOCUMENT_FILE_NAME: &str = "whiteboard.pdf";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: surface is empty")]
    EmptySurface,
    #[error("Rasterization failed: {0}")]
    Raster(String),
    #[error("PNG encoding failed: {0}")]
    Png(String),
    #[error("PDF writing failed: {0}")]
    Pdf(String),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Straight-alpha RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> ExportResult<Self> {
        if width == 0 || height == 0 {
            return Err(ExportError::EmptySurface);
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ExportError::Raster(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Copy the pixels out of a pixmap, undoing premultiplication.
    pub fn from_pixmap(pixmap: &Pixmap) -> ExportResult<Self> {
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Self::new(pixmap.width(), pixmap.height(), rgba)
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> ExportResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| ExportError::Png(e.to_string()))?;
            writer
                .write_image_data(&self.rgba)
                .map_err(|e| ExportError::Png(e.to_string()))?;
        }
        Ok(png_data)
    }

    /// Flatten onto an opaque background, dropping alpha.
    pub fn to_rgb_over(&self, background: SerializableColor) -> Vec<u8> {
        let bg = [background.r, background.g, background.b];
        let mut rgb = Vec::with_capacity(self.rgba.len() / 4 * 3);
        for px in self.rgba.chunks_exact(4) {
            let alpha = px[3] as u32;
            for channel in 0..3 {
                let blended =
                    (px[channel] as u32 * alpha + bg[channel] as u32 * (255 - alpha) + 127) / 255;
                rgb.push(blended as u8);
            }
        }
        rgb
    }
}

/// Turns the rendered surface into an image at a sampling scale.
pub trait Rasterizer {
    fn rasterize(&self, surface: &Surface, scale: f64) -> ExportResult<RasterImage>;
}

/// Resamples the surface pixmap with tiny-skia.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixmapRasterizer;

impl Rasterizer for PixmapRasterizer {
    fn rasterize(&self, surface: &Surface, scale: f64) -> ExportResult<RasterImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ExportError::Raster(format!("invalid scale {scale}")));
        }
        if (scale - 1.0).abs() < f64::EPSILON {
            return RasterImage::from_pixmap(surface.pixmap());
        }

        let width = (surface.width() as f64 * scale).round() as u32;
        let height = (surface.height() as f64 * scale).round() as u32;
        let mut scaled = Pixmap::new(width, height).ok_or_else(|| {
            ExportError::Raster(format!("cannot allocate {width}x{height} image"))
        })?;
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        scaled.draw_pixmap(
            0,
            0,
            surface.pixmap().as_ref(),
            &paint,
            Transform::from_scale(scale as f32, scale as f32),
            None,
        );
        RasterImage::from_pixmap(&scaled)
    }
}

/// Embeds an image as a single full-page document.
pub trait DocumentWriter {
    /// `page` is the page size in points.
    fn write_document(&self, image: &RasterImage, page: Size) -> ExportResult<Vec<u8>>;
}

/// Writes single-page PDF documents with lopdf.
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    /// Color transparent pixels are flattened onto.
    pub background: SerializableColor,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self {
            background: SerializableColor::white(),
        }
    }
}

impl DocumentWriter for PdfWriter {
    fn write_document(&self, image: &RasterImage, page: Size) -> ExportResult<Vec<u8>> {
        let pdf_err = |e: lopdf::Error| ExportError::Pdf(e.to_string());

        // Fit to page width, keeping the image's aspect ratio, top-aligned.
        let draw_width = page.width;
        let draw_height = page.width * image.height as f64 / image.width as f64;
        let draw_y = page.height - draw_height;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            image.to_rgb_over(self.background),
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(draw_width as f32),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(draw_height as f32),
                        Object::Integer(0),
                        Object::Real(draw_y as f32),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content.encode().map_err(pdf_err)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width as f32),
                Object::Real(page.height as f32),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1_i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).map_err(|e| ExportError::Pdf(e.to_string()))?;
        Ok(buffer)
    }
}

/// Where exported files end up.
pub trait ExportSink {
    /// Store `bytes` under `file_name`, returning a description of where
    /// they went.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<String>;
}

/// Writes exports into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<String> {
        std::fs::create_dir_all(&self.directory).map_err(|source| ExportError::Io {
            path: self.directory.clone(),
            source,
        })?;
        let path = self.directory.join(file_name);
        std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path.display().to_string())
    }
}

/// Keeps exports in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> ExportResult<String> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(format!("memory:{file_name}"))
    }
}

/// A completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub file_name: String,
    pub location: String,
    pub bytes: usize,
}

/// `whiteboard_at_<timestamp>.png`, with a colon-free UTC timestamp.
pub fn raster_file_name(at: DateTime<Utc>) -> String {
    format!("whiteboard_at_{}.png", at.format("%Y-%m-%dT%H-%M-%S%.3fZ"))
}

/// Landscape page with the canvas's pixel dimensions.
pub fn landscape_page(canvas: Size) -> Size {
    Size::new(
        canvas.width.max(canvas.height),
        canvas.width.min(canvas.height),
    )
}

/// Runs the export pipeline over a rendered surface.
#[derive(Debug)]
pub struct Exporter<R = PixmapRasterizer, W = PdfWriter, S = DirectorySink> {
    rasterizer: R,
    writer: W,
    sink: S,
    document_scale: f64,
}

impl Exporter {
    /// The file-based pipeline described by `settings`.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Exporter::new(
            PixmapRasterizer,
            PdfWriter {
                background: settings.background,
            },
            DirectorySink::new(&settings.directory),
        )
        .with_document_scale(settings.document_scale)
    }
}

impl<R: Rasterizer, W: DocumentWriter, S: ExportSink> Exporter<R, W, S> {
    pub fn new(rasterizer: R, writer: W, sink: S) -> Self {
        Self {
            rasterizer,
            writer,
            sink,
            document_scale: MIN_DOCUMENT_SCALE,
        }
    }

    /// Sampling scale for document export, never below [`MIN_DOCUMENT_SCALE`].
    pub fn with_document_scale(mut self, scale: f64) -> Self {
        self.document_scale = if scale.is_finite() {
            scale.max(MIN_DOCUMENT_SCALE)
        } else {
            MIN_DOCUMENT_SCALE
        };
        self
    }

    pub fn document_scale(&self) -> f64 {
        self.document_scale
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// PNG snapshot of the surface, named after `at`.
    pub fn export_raster(
        &mut self,
        surface: &Surface,
        at: DateTime<Utc>,
    ) -> ExportResult<ExportOutcome> {
        let image = self.rasterizer.rasterize(surface, 1.0)?;
        let bytes = image.encode_png()?;
        self.deliver(raster_file_name(at), bytes)
    }

    /// Single-page landscape PDF of the surface, sampled at the document scale.
    pub fn export_document(&mut self, surface: &Surface) -> ExportResult<ExportOutcome> {
        let image = self.rasterizer.rasterize(surface, self.document_scale)?;
        let bytes = self
            .writer
            .write_document(&image, landscape_page(surface.size()))?;
        self.deliver(DOCUMENT_FILE_NAME.to_string(), bytes)
    }

    fn deliver(&mut self, file_name: String, bytes: Vec<u8>) -> ExportResult<ExportOutcome> {
        let location = self.sink.deliver(&file_name, &bytes)?;
        log::info!("Exported {} ({} bytes) to {}", file_name, bytes.len(), location);
        Ok(ExportOutcome {
            file_name,
            location,
            bytes: bytes.len(),
        })
    }
}
