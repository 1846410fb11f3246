use anyhow::anyhow;
use hexaphone_core::{Surface, SurfaceError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// `Surface` over a canvas 2D context.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquires the 2D context; a canvas without one cannot host the board.
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow!("getContext failed: {:?}", e))?
            .ok_or_else(|| anyhow!("canvas has no 2d context"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow!("unexpected context type: {:?}", e))?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width.max(1));
        self.canvas.set_height(height.max(1));
    }

    #[allow(deprecated)]
    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style(&JsValue::from_str(color));
    }

    #[allow(deprecated)]
    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style(&JsValue::from_str(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.ctx.set_text_align(align);
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.ctx.set_text_baseline(baseline);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), SurfaceError> {
        self.ctx
            .fill_text(text, x as f64, y as f64)
            .map_err(|e| SurfaceError(format!("{:?}", e)))
    }
}
