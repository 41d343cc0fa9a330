//! A headless whiteboard session: canvas, renderer, surface and exporter
//! wired together the way a windowed shell would.

use crate::AppError;
use crate::script::{Script, ScriptStep};
use chrono::Utc;
use inkboard_core::canvas::Canvas;
use inkboard_core::config::Settings;
use inkboard_core::shapes::{SerializableColor, parse_fill};
use inkboard_core::text_metrics::FontMeasurer;
use inkboard_render::{
    DirectorySink, DocumentWriter, ExportOutcome, ExportResult, ExportSink, Exporter, PdfWriter,
    PixmapRasterizer, RenderContext, Rasterizer, Renderer, SkiaRenderer, Surface,
};
use peniko::Color;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message, shown by the surrounding shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "[info] {}", self.message),
            NoticeLevel::Error => write!(f, "[error] {}", self.message),
        }
    }
}

pub struct Session<R = PixmapRasterizer, W = PdfWriter, S = DirectorySink> {
    canvas: Canvas,
    renderer: SkiaRenderer,
    surface: Surface,
    exporter: Exporter<R, W, S>,
    background: Color,
    notices: Vec<Notice>,
    frames: usize,
}

impl Session {
    /// A session exporting into the directory named by `settings`.
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        Session::with_exporter(settings, Exporter::from_settings(&settings.export))
    }
}

impl<R: Rasterizer, W: DocumentWriter, S: ExportSink> Session<R, W, S> {
    pub fn with_exporter(
        settings: &Settings,
        exporter: Exporter<R, W, S>,
    ) -> Result<Self, AppError> {
        let font = FontMeasurer::discover(settings.font_path.as_deref());
        let mut canvas = Canvas::from_settings(settings);
        let renderer = match font {
            Some(font) => {
                canvas = canvas.with_measurer(Box::new(font.clone()));
                SkiaRenderer::with_font(font)
            }
            None => {
                log::warn!("No usable font found; text will use fallback metrics");
                SkiaRenderer::new()
            }
        };
        let surface = Surface::for_viewport(canvas.viewport())?;
        let mut session = Self {
            canvas,
            renderer,
            surface,
            exporter,
            background: settings.export.background.into(),
            notices: Vec::new(),
            frames: 0,
        };
        session.repaint()?;
        Ok(session)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn exporter(&self) -> &Exporter<R, W, S> {
        &self.exporter
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Number of full repaints performed so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Resize to the script's canvas and replay every step.
    pub fn run(&mut self, script: &Script) -> Result<(), AppError> {
        self.canvas.resize(script.width, script.height);
        self.repaint()?;
        for step in &script.steps {
            self.apply(step)?;
        }
        Ok(())
    }

    /// Apply one step, then repaint if anything visible changed.
    pub fn apply(&mut self, step: &ScriptStep) -> Result<(), AppError> {
        if let Some(event) = step.pointer_event() {
            self.canvas.handle_pointer(event);
        } else if let Some(event) = step.key_event() {
            if let Some(action) = self.canvas.handle_key(&event) {
                log::debug!("shortcut {action:?}");
            }
        } else {
            match step {
                ScriptStep::Tool { tool } => self.canvas.set_tool(*tool),
                ScriptStep::Color { color } => {
                    self.canvas.set_color(SerializableColor::from_hex(color)?)
                }
                ScriptStep::Fill { fill } => self.canvas.set_fill(parse_fill(fill)?),
                ScriptStep::StrokeWidth { width } => self.canvas.set_stroke_width(*width),
                ScriptStep::Opacity { opacity } => self.canvas.set_opacity(*opacity),
                ScriptStep::FontSize { size } => self.canvas.set_font_size(*size),
                ScriptStep::Text { value } => {
                    self.canvas.submit_text(value);
                }
                ScriptStep::CancelText => {
                    self.canvas.cancel_text();
                }
                ScriptStep::Duplicate => {
                    self.canvas.duplicate_selected();
                }
                ScriptStep::Delete => {
                    self.canvas.delete_selected();
                }
                ScriptStep::Undo => {
                    self.canvas.undo();
                }
                ScriptStep::Redo => {
                    self.canvas.redo();
                }
                ScriptStep::Clear => self.canvas.clear(),
                ScriptStep::ZoomIn => {
                    self.canvas.zoom_in();
                }
                ScriptStep::ZoomOut => {
                    self.canvas.zoom_out();
                }
                ScriptStep::Zoom { zoom } => {
                    self.canvas.set_zoom(*zoom);
                }
                ScriptStep::Resize { width, height } => self.canvas.resize(*width, *height),
                ScriptStep::ExportPng => self.export_png()?,
                ScriptStep::ExportPdf => self.export_pdf()?,
                ScriptStep::Status => log::info!("{}", self.canvas.status()),
                // Pointer and key steps were dispatched above.
                ScriptStep::Down { .. }
                | ScriptStep::Move { .. }
                | ScriptStep::Up { .. }
                | ScriptStep::Key { .. } => {}
            }
        }
        self.repaint()?;
        Ok(())
    }

    /// Redraw when the canvas is dirty or the backing store changed size.
    pub fn repaint(&mut self) -> Result<bool, AppError> {
        let resized = self.surface.resize(self.canvas.viewport())?;
        let dirty = self.canvas.take_dirty();
        if !(resized || dirty) {
            return Ok(false);
        }
        let ctx = RenderContext::new(&self.canvas).with_background(self.background);
        self.renderer.render(&ctx, &mut self.surface)?;
        self.frames += 1;
        Ok(true)
    }

    /// Export a PNG of what is on screen. Failures become a notice.
    pub fn export_png(&mut self) -> Result<(), AppError> {
        self.repaint()?;
        let result = self.exporter.export_raster(&self.surface, Utc::now());
        self.report("PNG", result);
        Ok(())
    }

    /// Export a PDF of what is on screen. Failures become a notice.
    pub fn export_pdf(&mut self) -> Result<(), AppError> {
        self.repaint()?;
        let result = self.exporter.export_document(&self.surface);
        self.report("PDF", result);
        Ok(())
    }

    fn report(&mut self, kind: &str, result: ExportResult<ExportOutcome>) {
        let notice = match result {
            Ok(outcome) => Notice::info(format!("Saved {}", outcome.location)),
            Err(e) => {
                log::error!("{kind} export failed: {e}");
                Notice::error(format!("{kind} export failed: {e}"))
            }
        };
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::tools::ToolKind;
    use inkboard_render::{ExportError, MemorySink, RasterImage};

    struct BrokenRasterizer;

    impl Rasterizer for BrokenRasterizer {
        fn rasterize(&self, _surface: &Surface, _scale: f64) -> ExportResult<RasterImage> {
            Err(ExportError::Raster("out of memory".to_string()))
        }
    }

    fn settings() -> Settings {
        Settings {
            font_path: Some("/nonexistent/font.ttf".into()),
            ..Settings::default()
        }
    }

    fn memory_session() -> Session<PixmapRasterizer, PdfWriter, MemorySink> {
        let exporter = Exporter::new(PixmapRasterizer, PdfWriter::default(), MemorySink::default());
        Session::with_exporter(&settings(), exporter).unwrap()
    }

    fn draw_rectangle<R, W, S>(session: &mut Session<R, W, S>)
    where
        R: Rasterizer,
        W: DocumentWriter,
        S: ExportSink,
    {
        let steps = [
            ScriptStep::Tool {
                tool: ToolKind::Rectangle,
            },
            ScriptStep::Down { x: 10.0, y: 10.0 },
            ScriptStep::Move { x: 60.0, y: 40.0 },
            ScriptStep::Up { x: 60.0, y: 40.0 },
        ];
        for step in &steps {
            session.apply(step).unwrap();
        }
    }

    #[test]
    fn test_repaint_only_when_dirty() {
        let mut session = memory_session();
        let frames = session.frames();
        assert!(!session.repaint().unwrap());
        assert_eq!(session.frames(), frames);

        session.apply(&ScriptStep::ZoomIn).unwrap();
        assert_eq!(session.frames(), frames + 1);
    }

    #[test]
    fn test_resize_reallocates_and_repaints() {
        let mut session = memory_session();
        session
            .apply(&ScriptStep::Resize {
                width: 120.0,
                height: 90.0,
            })
            .unwrap();
        assert_eq!((session.surface().width(), session.surface().height()), (120, 90));
        assert_eq!(session.surface().pixel(5, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_drawn_rectangle_reaches_surface() {
        let mut session = memory_session();
        draw_rectangle(&mut session);
        assert_eq!(session.canvas().elements().len(), 1);
        assert_eq!(session.surface().pixel(10, 25), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_exports_go_to_sink() {
        let mut session = memory_session();
        draw_rectangle(&mut session);
        session.apply(&ScriptStep::ExportPng).unwrap();
        session.apply(&ScriptStep::ExportPdf).unwrap();

        let files = &session.exporter().sink().files;
        assert_eq!(files.len(), 2);
        assert!(files[0].0.starts_with("whiteboard_at_"));
        assert_eq!(files[1].0, "whiteboard.pdf");
        assert!(session
            .notices()
            .iter()
            .all(|n| n.level == NoticeLevel::Info));
    }

    #[test]
    fn test_export_failure_leaves_drawing_untouched() {
        let exporter = Exporter::new(BrokenRasterizer, PdfWriter::default(), MemorySink::default());
        let mut session = Session::with_exporter(&settings(), exporter).unwrap();
        draw_rectangle(&mut session);
        let elements = session.canvas().elements().to_vec();
        let history_len = session.canvas().history().len();

        session.apply(&ScriptStep::ExportPng).unwrap();
        session.apply(&ScriptStep::ExportPdf).unwrap();

        assert_eq!(session.canvas().elements(), elements.as_slice());
        assert_eq!(session.canvas().history().len(), history_len);
        assert_eq!(session.notices().len(), 2);
        assert!(session
            .notices()
            .iter()
            .all(|n| n.level == NoticeLevel::Error));
        assert!(session.exporter().sink().files.is_empty());
    }

    #[test]
    fn test_non_drawing_step_returns_unit() {
        let mut session = memory_session();
        let frames = session.frames();
        let result: Result<(), AppError> = session.apply(&ScriptStep::Status);
        assert!(result.is_ok());
        assert_eq!(session.frames(), frames);

        session.apply(&ScriptStep::Clear).unwrap();
        assert!(session.canvas().elements().is_empty());
    }

    #[test]
    fn test_bad_color_is_an_error() {
        let mut session = memory_session();
        let err = session
            .apply(&ScriptStep::Color {
                color: "red".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Color(_)));
    }

    #[test]
    fn test_run_script_with_undo_shortcut() {
        let mut session = memory_session();
        let script = Script::from_json(
            r#"{
                "width": 200,
                "height": 100,
                "steps": [
                    {"op": "down", "x": 10, "y": 10},
                    {"op": "move", "x": 20, "y": 20},
                    {"op": "up", "x": 30, "y": 30},
                    {"op": "key", "key": "z", "ctrl": true}
                ]
            }"#,
        )
        .unwrap();
        session.run(&script).unwrap();
        assert!(session.canvas().elements().is_empty());
        assert!(session.canvas().history().can_redo());
        assert_eq!(session.surface().width(), 200);
    }
}
