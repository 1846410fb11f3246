// Test doubles shared by the integration tests: a surface that records draw
// calls, an audio engine whose sample loads complete on demand, and clocks.

#![allow(dead_code)]

use futures::channel::oneshot;
use hexaphone_core::{AudioEngine, AudioError, Clock, Surface, SurfaceError, Timbre};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f32),
    BeginPath,
    MoveTo(f32, f32),
    LineTo(f32, f32),
    ClosePath,
    Fill,
    Stroke,
    FillRect(f32, f32, f32, f32),
    Font(String),
    TextAlign(String),
    TextBaseline(String),
    FillText(String, f32, f32),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<Op>,
    pub fail_text: bool,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(Op::FillStyle(color.to_string()));
    }
    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(Op::StrokeStyle(color.to_string()));
    }
    fn set_line_width(&mut self, width: f32) {
        self.ops.push(Op::LineWidth(width));
    }
    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }
    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(Op::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(Op::LineTo(x, y));
    }
    fn close_path(&mut self) {
        self.ops.push(Op::ClosePath);
    }
    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }
    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(Op::FillRect(x, y, width, height));
    }
    fn set_font(&mut self, font: &str) {
        self.ops.push(Op::Font(font.to_string()));
    }
    fn set_text_align(&mut self, align: &str) {
        self.ops.push(Op::TextAlign(align.to_string()));
    }
    fn set_text_baseline(&mut self, baseline: &str) {
        self.ops.push(Op::TextBaseline(baseline.to_string()));
    }
    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), SurfaceError> {
        if self.fail_text {
            return Err(SurfaceError("text rendering unavailable".into()));
        }
        self.ops.push(Op::FillText(text.to_string(), x, y));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub started: bool,
    pub active: Timbre,
    pub triggers: Vec<(f32, f32, f32)>,
    pub load_calls: Vec<Timbre>,
    pub pending: Vec<oneshot::Sender<Result<(), AudioError>>>,
}

/// Engine whose sample loads stay pending until `finish_load` is called.
#[derive(Clone, Debug, Default)]
pub struct FakeEngine {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeEngine {
    pub fn finish_load(&self, result: Result<(), AudioError>) {
        let tx = self.state.borrow_mut().pending.remove(0);
        let _ = tx.send(result);
    }

    pub fn triggers(&self) -> Vec<(f32, f32, f32)> {
        self.state.borrow().triggers.clone()
    }
}

impl AudioEngine for FakeEngine {
    async fn start(&self) -> Result<(), AudioError> {
        self.state.borrow_mut().started = true;
        Ok(())
    }

    async fn load_timbre(&self, timbre: Timbre) -> Result<(), AudioError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut s = self.state.borrow_mut();
            s.load_calls.push(timbre);
            s.pending.push(tx);
        }
        rx.await.unwrap_or_else(|_| {
            Err(AudioError::LoadFailed {
                timbre,
                reason: "dropped".into(),
            })
        })
    }

    fn set_active_timbre(&self, timbre: Timbre) {
        self.state.borrow_mut().active = timbre;
    }

    fn trigger(&self, frequency_hz: f32, gain: f32, duration_sec: f32) -> Result<(), AudioError> {
        self.state
            .borrow_mut()
            .triggers
            .push((frequency_hz, gain, duration_sec));
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Clock that advances by `step_ms` on every read, so each paint appears to
/// take exactly `step_ms`.
#[derive(Debug)]
pub struct SteppingClock {
    now: Cell<f64>,
    step_ms: f64,
}

impl SteppingClock {
    pub fn new(step_ms: f64) -> Self {
        Self {
            now: Cell::new(0.0),
            step_ms,
        }
    }
}

impl Clock for SteppingClock {
    fn now_ms(&self) -> f64 {
        let t = self.now.get();
        self.now.set(t + self.step_ms);
        t
    }
}
