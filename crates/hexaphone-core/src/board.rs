//! The board: one explicit context owning everything an instrument instance
//! needs.
//!
//! The board exclusively owns the drawing surface and the current layout.
//! Layout rebuilds (resize, tonality, palette) happen synchronously inside the
//! call that caused them and replace the `Rc` wholesale, so the next hit test
//! and the next frame always see a complete grid.

use crate::audio::{AudioBridge, AudioEngine};
use crate::broadcast::{BroadcastSink, NoteMessage};
use crate::config::BoardConfig;
use crate::constants::BACKDROP_COLOR;
use crate::error::AudioError;
use crate::input::{InputDispatcher, PitchBatch, TouchPoint};
use crate::layout::{key_scale, KeyboardLayout, LayoutBuilder, Palette};
use crate::music::{KeyLabels, Tonality};
use crate::render::{CancelToken, Clock, Element, RenderLoop, Renderer, Surface};
use crate::signal::{Topic, Watch};
use crate::timbre::Timbre;
use futures::channel::mpsc::UnboundedReceiver;
use std::future::Future;
use std::rc::Rc;

/// Loudness used for pointer and touch input, which carries no pressure.
pub const DEFAULT_INTENSITY: f32 = 1.0;

pub struct Board<E: AudioEngine, S: Surface> {
    config: BoardConfig,
    surface: S,
    palette: Palette,
    layout: Rc<KeyboardLayout>,
    tonality: Watch<Option<Tonality>>,
    timbre: Watch<Timbre>,
    touches: Topic<PitchBatch>,
    dispatcher: InputDispatcher,
    audio: AudioBridge<E>,
    broadcast: Option<Box<dyn BroadcastSink>>,
    renderer: Renderer,
    render_loop: RenderLoop,
}

impl<E: AudioEngine, S: Surface> Board<E, S> {
    /// Builds the first layout for the surface's current size. The renderer
    /// starts with a backdrop and the keyboard.
    pub fn new(config: BoardConfig, engine: E, surface: S) -> Self {
        log::info!(
            "[board] initializing {}x{} tonality={:?} timbre={}",
            surface.width(),
            surface.height(),
            config.tonality.map(|t| t.to_string()),
            config.timbre
        );
        let mut renderer = Renderer::new();
        renderer.add_element(Element::Backdrop(BACKDROP_COLOR.to_string()));
        renderer.add_element(Element::Keyboard);

        let mut board = Self {
            palette: Palette::with_labels(config.labels),
            layout: Rc::new(KeyboardLayout::empty()),
            tonality: Watch::new(config.tonality),
            timbre: Watch::new(Timbre::Basic),
            touches: Topic::new(),
            dispatcher: InputDispatcher::new(config.drag_sample_rate_ms),
            audio: AudioBridge::new(engine),
            broadcast: None,
            renderer,
            render_loop: RenderLoop::new(config.target_fps),
            surface,
            config,
        };
        board.rebuild();
        board
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The layout hit tests and frames currently use.
    pub fn layout(&self) -> Rc<KeyboardLayout> {
        self.layout.clone()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn audio(&self) -> &AudioBridge<E> {
        &self.audio
    }

    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }

    // ---------------- Layout ----------------

    fn rebuild(&mut self) {
        let (w, h) = (self.surface.width() as f32, self.surface.height() as f32);
        let scale = key_scale(w, h, self.config.key_scale);
        let layout = LayoutBuilder::for_viewport(w, h, scale)
            .tonality(*self.tonality.get())
            .palette(self.palette.clone())
            .build();
        log::debug!("[board] layout rebuilt: {} cells, scale {:.1}", layout.len(), scale);
        self.layout = Rc::new(layout);
    }

    /// Resizes the surface and rebuilds the layout. No-op when the size is
    /// unchanged; returns whether anything happened.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.surface.width() && height == self.surface.height() {
            return false;
        }
        log::info!("[board] resize to {}x{}", width, height);
        self.surface.resize(width, height);
        self.rebuild();
        true
    }

    pub fn tonality(&self) -> Option<Tonality> {
        *self.tonality.get()
    }

    pub fn set_tonality(&mut self, tonality: Option<Tonality>) {
        log::info!("[board] tonality -> {:?}", tonality.map(|t| t.to_string()));
        self.tonality.set(tonality);
        self.rebuild();
    }

    pub fn subscribe_tonality(&mut self) -> UnboundedReceiver<Option<Tonality>> {
        self.tonality.subscribe()
    }

    pub fn labels(&self) -> KeyLabels {
        self.config.labels
    }

    /// Switches label style, keeping custom fill and stroke rules.
    pub fn set_labels(&mut self, labels: KeyLabels) {
        self.config.labels = labels;
        self.palette.label = Palette::with_labels(labels).label;
        self.rebuild();
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.rebuild();
    }

    // ---------------- Audio ----------------

    /// Starts the audio engine; must be driven from a user gesture.
    pub fn start_audio(&self) -> impl Future<Output = Result<(), AudioError>> + 'static {
        self.audio.start()
    }

    pub fn load_timbre(
        &self,
        timbre: Timbre,
    ) -> impl Future<Output = Result<(), AudioError>> + 'static {
        self.audio.load_timbre(timbre)
    }

    pub fn timbre(&self) -> Timbre {
        *self.timbre.get()
    }

    /// Selects `timbre` now; the returned future completes once its samples
    /// are loaded. The board is not borrowed by the future.
    pub fn set_timbre(
        &mut self,
        timbre: Timbre,
    ) -> impl Future<Output = Result<(), AudioError>> + 'static {
        self.timbre.set(timbre);
        self.audio.set_timbre(timbre)
    }

    pub fn subscribe_timbre(&mut self) -> UnboundedReceiver<Timbre> {
        self.timbre.subscribe()
    }

    pub fn set_broadcast(&mut self, sink: Option<Box<dyn BroadcastSink>>) {
        self.broadcast = sink;
    }

    /// Plays one pitch and forwards it to the broadcast sink.
    pub fn trigger(&self, frequency_hz: f32, intensity: f32) -> Result<(), AudioError> {
        if let Some(sink) = &self.broadcast {
            sink.send(&NoteMessage {
                frequency: frequency_hz,
                force: intensity,
            });
        }
        self.audio.trigger(frequency_hz, intensity)
    }

    // ---------------- Input ----------------

    /// Stream of pitch batches, one per input event that hit playable keys.
    pub fn subscribe_touches(&mut self) -> UnboundedReceiver<PitchBatch> {
        self.touches.subscribe()
    }

    fn emit(&mut self, batch: Option<PitchBatch>) -> Option<PitchBatch> {
        let batch = batch?;
        for &pitch in &batch {
            match self.trigger(pitch, DEFAULT_INTENSITY) {
                Ok(()) => {}
                Err(AudioError::NotStarted) => {
                    log::debug!("[board] audio not started, {:.2} Hz silent", pitch)
                }
                Err(e) => log::warn!("[board] {}", e),
            }
        }
        self.touches.publish(batch.clone());
        Some(batch)
    }

    pub fn pointer_down(&mut self, now_ms: f64) {
        self.dispatcher.pointer_down(now_ms);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) -> Option<PitchBatch> {
        let batch = self.dispatcher.pointer_move(&self.layout, x, y, now_ms);
        self.emit(batch)
    }

    pub fn pointer_up(&mut self) {
        self.dispatcher.pointer_up();
    }

    pub fn click(&mut self, x: f32, y: f32) -> Option<PitchBatch> {
        let batch = self.dispatcher.click(&self.layout, x, y);
        self.emit(batch)
    }

    pub fn touch_start(&mut self, points: &[TouchPoint], now_ms: f64) -> Option<PitchBatch> {
        let batch = self.dispatcher.touch_start(&self.layout, points, now_ms);
        self.emit(batch)
    }

    pub fn touch_move(&mut self, points: &[TouchPoint], now_ms: f64) -> Option<PitchBatch> {
        let batch = self.dispatcher.touch_move(&self.layout, points, now_ms);
        self.emit(batch)
    }

    pub fn touch_end(&mut self, ids: &[i32]) {
        self.dispatcher.touch_end(ids);
    }

    // ---------------- Rendering ----------------

    pub fn start_loop(&mut self) -> CancelToken {
        log::info!(
            "[render] loop at {:.0} fps ({:.1} ms budget)",
            self.config.target_fps,
            self.render_loop.frame_budget_ms()
        );
        self.render_loop.start()
    }

    pub fn stop_loop(&mut self) {
        self.render_loop.stop();
    }

    pub fn is_looping(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Paints one frame regardless of the loop state.
    pub fn render_frame(&mut self) -> usize {
        self.renderer.render(&mut self.surface, &self.layout)
    }

    /// One scheduled frame; returns the delay before the next one, or `None`
    /// once the loop is stopped.
    pub fn render_tick(&mut self, clock: &dyn Clock) -> Option<f64> {
        let renderer = &self.renderer;
        let surface = &mut self.surface;
        let layout = &self.layout;
        self.render_loop.tick(clock, || {
            renderer.render(surface, layout);
        })
    }
}
