//! WebAudio implementation of the board's sound engine.
//!
//! Graph: voices -> master gain -> compressor -> destination. The basic
//! timbre is a one-shot oscillator; sampled timbres play the nearest decoded
//! sample, repitched through `playbackRate`.

use fnv::FnvHashMap;
use hexaphone_core::{hz_to_midi_f, AudioEngine, AudioError, Timbre};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

const MASTER_GAIN: f32 = 0.5;
const COMPRESSOR_THRESHOLD_DB: f32 = -30.0;
const COMPRESSOR_RATIO: f32 = 4.0;
const ATTACK_SEC: f64 = 0.02;
/// Recorded notes ring this many times longer than the synthesized voice.
const SAMPLE_TAIL_FACTOR: f64 = 3.0;

struct LoadedSample {
    midi: f32,
    buffer: web::AudioBuffer,
}

struct Graph {
    ctx: web::AudioContext,
    master: web::GainNode,
}

#[derive(Default)]
struct Inner {
    graph: RefCell<Option<Graph>>,
    active: Cell<Timbre>,
    samples: RefCell<FnvHashMap<Timbre, Rc<Vec<LoadedSample>>>>,
}

#[derive(Clone, Default)]
pub struct WebAudioEngine {
    inner: Rc<Inner>,
}

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> Result<web::GainNode, AudioError> {
    match web::GainNode::new(ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("[audio] {} GainNode error: {:?}", label, e);
            Err(AudioError::Engine(js_err(e)))
        }
    }
}

fn build_graph() -> Result<Graph, AudioError> {
    let start_failed = |e: JsValue| AudioError::StartFailed(js_err(e));
    let ctx = web::AudioContext::new().map_err(start_failed)?;
    let master = create_gain(&ctx, MASTER_GAIN, "master")?;
    let compressor = web::DynamicsCompressorNode::new(&ctx).map_err(start_failed)?;
    compressor.threshold().set_value(COMPRESSOR_THRESHOLD_DB);
    compressor.ratio().set_value(COMPRESSOR_RATIO);
    master
        .connect_with_audio_node(&compressor)
        .map_err(start_failed)?;
    compressor
        .connect_with_audio_node(&ctx.destination())
        .map_err(start_failed)?;
    Ok(Graph { ctx, master })
}

async fn fetch_sample(
    window: &web::Window,
    ctx: &web::AudioContext,
    url: &str,
) -> Result<web::AudioBuffer, String> {
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?
        .dyn_into::<web::Response>()
        .map_err(js_err)?;
    if !resp.ok() {
        return Err(format!("{} returned {}", url, resp.status()));
    }
    let bytes = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into::<js_sys::ArrayBuffer>()
        .map_err(js_err)?;
    JsFuture::from(ctx.decode_audio_data(&bytes).map_err(js_err)?)
        .await
        .map_err(js_err)?
        .dyn_into::<web::AudioBuffer>()
        .map_err(js_err)
}

impl WebAudioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&self) -> Result<(web::AudioContext, web::GainNode), AudioError> {
        self.inner
            .graph
            .borrow()
            .as_ref()
            .map(|g| (g.ctx.clone(), g.master.clone()))
            .ok_or(AudioError::NotStarted)
    }

    // Fire a one-shot oscillator with a short attack and linear release
    fn play_basic(
        &self,
        ctx: &web::AudioContext,
        master: &web::GainNode,
        frequency_hz: f32,
        gain: f32,
        duration_sec: f64,
    ) -> Result<(), JsValue> {
        let src = web::OscillatorNode::new(ctx)?;
        src.set_type(web::OscillatorType::Triangle);
        src.frequency().set_value(frequency_hz);
        let g = web::GainNode::new(ctx)?;
        g.gain().set_value(0.0);
        let t0 = ctx.current_time() + 0.005;
        g.gain().linear_ramp_to_value_at_time(gain, t0 + ATTACK_SEC)?;
        g.gain().linear_ramp_to_value_at_time(0.0, t0 + duration_sec)?;
        src.connect_with_audio_node(&g)?;
        g.connect_with_audio_node(master)?;
        src.start_with_when(t0)?;
        src.stop_with_when(t0 + duration_sec + 0.05)?;
        Ok(())
    }

    fn play_sample(
        &self,
        ctx: &web::AudioContext,
        master: &web::GainNode,
        sample: &LoadedSample,
        frequency_hz: f32,
        gain: f32,
        duration_sec: f64,
    ) -> Result<(), JsValue> {
        let src = ctx.create_buffer_source()?;
        src.set_buffer(Some(&sample.buffer));
        let shift = hz_to_midi_f(frequency_hz) - sample.midi;
        src.playback_rate().set_value(2f32.powf(shift / 12.0));
        let g = web::GainNode::new(ctx)?;
        let t0 = ctx.current_time() + 0.005;
        let tail = duration_sec * SAMPLE_TAIL_FACTOR;
        g.gain().set_value_at_time(gain, t0)?;
        g.gain().linear_ramp_to_value_at_time(0.0, t0 + tail)?;
        src.connect_with_audio_node(&g)?;
        g.connect_with_audio_node(master)?;
        src.start_with_when(t0)?;
        src.stop_with_when(t0 + tail + 0.05)?;
        Ok(())
    }
}

impl AudioEngine for WebAudioEngine {
    async fn start(&self) -> Result<(), AudioError> {
        if self.inner.graph.borrow().is_none() {
            let graph = build_graph()?;
            *self.inner.graph.borrow_mut() = Some(graph);
        }
        let (ctx, _) = self.context()?;
        if ctx.state() == web::AudioContextState::Suspended {
            let resume = ctx
                .resume()
                .map_err(|e| AudioError::StartFailed(js_err(e)))?;
            JsFuture::from(resume)
                .await
                .map_err(|e| AudioError::StartFailed(js_err(e)))?;
        }
        log::info!("[audio] context running at {} Hz", ctx.sample_rate());
        Ok(())
    }

    async fn load_timbre(&self, timbre: Timbre) -> Result<(), AudioError> {
        if timbre.is_synthesized() || self.inner.samples.borrow().contains_key(&timbre) {
            return Ok(());
        }
        let (ctx, _) = self.context()?;
        let failed = |reason: String| AudioError::LoadFailed { timbre, reason };
        let window = web::window().ok_or_else(|| failed("no window".into()))?;

        let mut loaded = Vec::with_capacity(timbre.samples().len());
        for sample in timbre.samples() {
            let Some(midi) = sample.midi() else {
                log::warn!("[audio] skipping sample with bad note name {}", sample.note);
                continue;
            };
            let url = timbre.sample_url(sample);
            let buffer = fetch_sample(&window, &ctx, &url).await.map_err(failed)?;
            log::debug!("[audio] decoded {}", url);
            loaded.push(LoadedSample {
                midi: midi as f32,
                buffer,
            });
        }
        if loaded.is_empty() {
            return Err(failed("no usable samples".into()));
        }
        self.inner
            .samples
            .borrow_mut()
            .insert(timbre, Rc::new(loaded));
        Ok(())
    }

    fn set_active_timbre(&self, timbre: Timbre) {
        self.inner.active.set(timbre);
    }

    fn trigger(&self, frequency_hz: f32, gain: f32, duration_sec: f32) -> Result<(), AudioError> {
        let (ctx, master) = self.context()?;
        let timbre = self.inner.active.get();
        let duration_sec = duration_sec as f64;
        let played = if timbre.is_synthesized() {
            self.play_basic(&ctx, &master, frequency_hz, gain, duration_sec)
        } else {
            let samples = self
                .inner
                .samples
                .borrow()
                .get(&timbre)
                .cloned()
                .ok_or(AudioError::TimbreNotReady(timbre))?;
            let target = hz_to_midi_f(frequency_hz);
            let nearest = samples
                .iter()
                .min_by(|a, b| {
                    (a.midi - target)
                        .abs()
                        .total_cmp(&(b.midi - target).abs())
                })
                .ok_or(AudioError::TimbreNotReady(timbre))?;
            self.play_sample(&ctx, &master, nearest, frequency_hz, gain, duration_sec)
        };
        played.map_err(|e| AudioError::Engine(js_err(e)))
    }
}
