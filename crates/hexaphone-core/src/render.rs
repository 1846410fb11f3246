//! Scene painting and the self-correcting frame scheduler.
//!
//! Painting goes through the `Surface` trait so the same scene code drives a
//! browser canvas and the recording surface used by tests. The scheduler
//! never sleeps itself: `RenderLoop::tick` paints once and returns how long
//! the caller should wait before the next tick.

use crate::constants::{LABEL_FONT_RATIO, TARGET_FPS};
use crate::error::SurfaceError;
use crate::geometry::hexagon_corners;
use crate::layout::{HexCell, KeyboardLayout};
use glam::Vec2;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// The subset of a 2D drawing context the scene needs.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);
    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), SurfaceError>;
}

/// Milliseconds from an arbitrary but fixed origin.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Optional styling for a single hexagon. Unset fields keep whatever the
/// surface currently has.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexagonStyle<'a> {
    pub fill: Option<&'a str>,
    pub stroke: Option<&'a str>,
    pub stroke_width: Option<f32>,
    pub text: Option<&'a str>,
    pub font: Option<&'a str>,
    pub text_color: Option<&'a str>,
}

/// Fills and strokes a pointed-top hexagon, then centers the optional label
/// on it. Labels use `text_color`, falling back to the stroke color.
pub fn draw_hexagon(
    surface: &mut dyn Surface,
    center: Vec2,
    tip_radius: f32,
    style: &HexagonStyle<'_>,
) -> Result<(), SurfaceError> {
    if let Some(fill) = style.fill {
        surface.set_fill_style(fill);
    }
    if let Some(stroke) = style.stroke {
        surface.set_stroke_style(stroke);
    }
    if let Some(w) = style.stroke_width.filter(|w| *w > 0.0) {
        surface.set_line_width(w);
    }

    let corners = hexagon_corners(center, tip_radius);
    surface.begin_path();
    surface.move_to(corners[0].x, corners[0].y);
    for c in &corners[1..] {
        surface.line_to(c.x, c.y);
    }
    surface.close_path();
    surface.fill();
    surface.stroke();

    if let Some(text) = style.text.filter(|t| !t.is_empty()) {
        let color = style.text_color.or(style.stroke).unwrap_or("black");
        surface.set_fill_style(color);
        if let Some(font) = style.font {
            surface.set_font(font);
        }
        surface.set_text_align("center");
        surface.set_text_baseline("middle");
        surface.fill_text(text, center.x, center.y)?;
    }
    Ok(())
}

pub fn label_font(scale: f32) -> String {
    format!("{}px sans-serif", (scale * LABEL_FONT_RATIO).round().max(1.0))
}

pub fn draw_cell(surface: &mut dyn Surface, cell: &HexCell, font: &str) -> Result<(), SurfaceError> {
    draw_hexagon(
        surface,
        cell.center,
        cell.tip_radius,
        &HexagonStyle {
            fill: Some(&cell.fill),
            stroke: Some(&cell.stroke),
            stroke_width: Some(cell.stroke_width),
            text: Some(&cell.label),
            font: Some(font),
            text_color: None,
        },
    )
}

/// Paints every cell. Keeps going past failing cells and returns the first
/// error, if any.
pub fn draw_layout(surface: &mut dyn Surface, layout: &KeyboardLayout) -> Result<(), SurfaceError> {
    let font = label_font(layout.scale());
    let mut first_err = None;
    for cell in layout.cells() {
        if let Err(e) = draw_cell(surface, cell, &font) {
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(()), Err)
}

pub type DrawFn = Box<dyn Fn(&mut dyn Surface) -> Result<(), SurfaceError>>;

/// Something the renderer paints every frame.
pub enum Element {
    /// Solid fill over the whole surface.
    Backdrop(String),
    /// The board's current key layout.
    Keyboard,
    Custom(DrawFn),
}

impl Element {
    pub fn draw(&self, surface: &mut dyn Surface, layout: &KeyboardLayout) -> Result<(), SurfaceError> {
        match self {
            Element::Backdrop(color) => {
                surface.set_fill_style(color);
                let (w, h) = (surface.width() as f32, surface.height() as f32);
                surface.fill_rect(0.0, 0.0, w, h);
                Ok(())
            }
            Element::Keyboard => draw_layout(surface, layout),
            Element::Custom(draw) => draw(surface),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Backdrop(c) => f.debug_tuple("Backdrop").field(c).finish(),
            Element::Keyboard => f.write_str("Keyboard"),
            Element::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Renderer {
    elements: Vec<Element>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Paints all elements in order. A failing element is logged and skipped;
    /// returns how many failed.
    pub fn render(&self, surface: &mut dyn Surface, layout: &KeyboardLayout) -> usize {
        let mut failures = 0;
        for element in &self.elements {
            if let Err(e) = element.draw(surface, layout) {
                failures += 1;
                log::warn!("[render] {:?} failed: {}", element, e);
            }
        }
        failures
    }
}

/// Shared stop flag for a running loop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Delay before the next frame given how long the last paint took.
#[inline]
pub fn next_delay_ms(frame_budget_ms: f64, elapsed_ms: f64) -> f64 {
    (frame_budget_ms - elapsed_ms).max(0.0)
}

#[derive(Debug)]
pub struct RenderLoop {
    frame_budget_ms: f64,
    token: Option<CancelToken>,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(TARGET_FPS)
    }
}

impl RenderLoop {
    pub fn new(target_fps: f64) -> Self {
        Self {
            frame_budget_ms: 1000.0 / target_fps.max(1.0),
            token: None,
        }
    }

    pub fn frame_budget_ms(&self) -> f64 {
        self.frame_budget_ms
    }

    /// Marks the loop running. A previous run's token is cancelled so its
    /// driver stops rescheduling.
    pub fn start(&mut self) -> CancelToken {
        self.stop();
        let token = CancelToken::new();
        self.token = Some(token.clone());
        token
    }

    pub fn stop(&mut self) {
        if let Some(t) = self.token.take() {
            t.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Runs one paint and returns the delay until the next tick, or `None`
    /// once the loop has been stopped.
    pub fn tick(&self, clock: &dyn Clock, paint: impl FnOnce()) -> Option<f64> {
        if !self.is_running() {
            return None;
        }
        let start = clock.now_ms();
        paint();
        let elapsed = clock.now_ms() - start;
        Some(next_delay_ms(self.frame_budget_ms, elapsed))
    }
}
