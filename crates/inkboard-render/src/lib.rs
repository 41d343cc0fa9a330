//! Inkboard Render Library
//!
//! Renderer abstraction and implementations for Inkboard.
//! The default implementation rasterizes on the CPU with tiny-skia; the
//! resulting surface is what export reads.

pub mod export;
mod renderer;
mod skia_impl;
mod surface;

pub use export::{
    DirectorySink, DocumentWriter, ExportError, ExportOutcome, ExportResult, ExportSink, Exporter,
    MemorySink, PdfWriter, PixmapRasterizer, RasterImage, Rasterizer, raster_file_name,
};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use skia_impl::SkiaRenderer;
pub use surface::Surface;
