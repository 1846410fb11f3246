//! Bridge between triggered pitches and the sound engine.
//!
//! The engine itself is an opaque capability behind `AudioEngine`. The bridge
//! tracks which timbre is selected and whether its samples have arrived, and
//! refuses to trigger a sample timbre that is not loaded yet.

use crate::constants::{A4_HZ, BASIC_GAIN_MAX, BASIC_GAIN_MIN, NOTE_DURATION_SEC};
use crate::error::AudioError;
use crate::timbre::Timbre;
use fnv::FnvHashMap;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// One in-flight sample load, awaited by every caller asking for the same
/// timbre.
type PendingLoad = Shared<LocalBoxFuture<'static, Result<(), AudioError>>>;

/// A sound engine the bridge can drive. Implementations are cheap handles
/// (clones share the same underlying engine).
#[allow(async_fn_in_trait)]
pub trait AudioEngine: Clone + 'static {
    /// Resumes/creates the audio output. Browsers only allow this from a user
    /// gesture.
    async fn start(&self) -> Result<(), AudioError>;
    /// Fetches and decodes every sample of `timbre`.
    async fn load_timbre(&self, timbre: Timbre) -> Result<(), AudioError>;
    fn set_active_timbre(&self, timbre: Timbre);
    fn trigger(&self, frequency_hz: f32, gain: f32, duration_sec: f32) -> Result<(), AudioError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

#[derive(Default)]
pub struct TimbreState {
    current: Timbre,
    loads: FnvHashMap<Timbre, LoadState>,
    pending: FnvHashMap<Timbre, PendingLoad>,
    started: bool,
}

impl fmt::Debug for TimbreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimbreState")
            .field("current", &self.current)
            .field("loads", &self.loads)
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .field("started", &self.started)
            .finish()
    }
}

impl TimbreState {
    pub fn current(&self) -> Timbre {
        self.current
    }

    pub fn load_state(&self, timbre: Timbre) -> LoadState {
        if timbre.is_synthesized() {
            return LoadState::Loaded;
        }
        self.loads.get(&timbre).copied().unwrap_or_default()
    }

    pub fn is_ready(&self, timbre: Timbre) -> bool {
        self.load_state(timbre) == LoadState::Loaded
    }

    fn mark(&mut self, timbre: Timbre, state: LoadState) {
        self.loads.insert(timbre, state);
    }
}

/// Loudness compensation for the synthesized voice: lower notes get more gain.
#[inline]
pub fn basic_gain(frequency_hz: f32) -> f32 {
    if frequency_hz.is_nan() || frequency_hz <= 0.0 {
        return BASIC_GAIN_MIN;
    }
    (A4_HZ / frequency_hz).clamp(BASIC_GAIN_MIN, BASIC_GAIN_MAX)
}

#[derive(Clone, Debug)]
pub struct AudioBridge<E: AudioEngine> {
    engine: E,
    state: Rc<RefCell<TimbreState>>,
    note_duration_sec: f32,
}

impl<E: AudioEngine> AudioBridge<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: Rc::new(RefCell::new(TimbreState::default())),
            note_duration_sec: NOTE_DURATION_SEC,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn timbre(&self) -> Timbre {
        self.state.borrow().current
    }

    pub fn load_state(&self, timbre: Timbre) -> LoadState {
        self.state.borrow().load_state(timbre)
    }

    pub fn is_started(&self) -> bool {
        self.state.borrow().started
    }

    /// Starts the engine once; later calls resolve immediately.
    pub fn start(&self) -> impl Future<Output = Result<(), AudioError>> + 'static {
        let engine = self.engine.clone();
        let state = self.state.clone();
        async move {
            if state.borrow().started {
                return Ok(());
            }
            engine.start().await?;
            state.borrow_mut().started = true;
            log::info!("[audio] engine started");
            Ok(())
        }
    }

    /// Loads the samples of `timbre`. The synthesized voice and already loaded
    /// timbres resolve immediately; a failed load can be retried. Concurrent
    /// requests for the same timbre share one engine load.
    pub fn load_timbre(
        &self,
        timbre: Timbre,
    ) -> impl Future<Output = Result<(), AudioError>> + 'static {
        let pending = self.begin_load(timbre);
        async move {
            match pending {
                Some(load) => load.await,
                None => Ok(()),
            }
        }
    }

    fn begin_load(&self, timbre: Timbre) -> Option<PendingLoad> {
        let mut s = self.state.borrow_mut();
        if s.is_ready(timbre) {
            return None;
        }
        if let Some(load) = s.pending.get(&timbre) {
            log::debug!("[audio] {} already loading", timbre);
            return Some(load.clone());
        }
        s.mark(timbre, LoadState::Loading);
        let fresh = load(self.engine.clone(), self.state.clone(), timbre)
            .boxed_local()
            .shared();
        s.pending.insert(timbre, fresh.clone());
        Some(fresh)
    }

    /// Selects `timbre` right away and loads it if needed. Until the load
    /// completes, triggers fail with `TimbreNotReady`.
    pub fn set_timbre(
        &self,
        timbre: Timbre,
    ) -> impl Future<Output = Result<(), AudioError>> + 'static {
        self.state.borrow_mut().current = timbre;
        self.engine.set_active_timbre(timbre);
        log::info!("[audio] timbre -> {}", timbre);
        self.load_timbre(timbre)
    }

    pub fn trigger(&self, frequency_hz: f32, intensity: f32) -> Result<(), AudioError> {
        let (timbre, started, ready) = {
            let s = self.state.borrow();
            (s.current, s.started, s.is_ready(s.current))
        };
        if !started {
            return Err(AudioError::NotStarted);
        }
        if !ready {
            return Err(AudioError::TimbreNotReady(timbre));
        }
        let intensity = intensity.clamp(0.0, 1.0);
        let gain = if timbre.is_synthesized() {
            basic_gain(frequency_hz) * intensity
        } else {
            intensity
        };
        self.engine
            .trigger(frequency_hz, gain, self.note_duration_sec)
    }
}

async fn load<E: AudioEngine>(
    engine: E,
    state: Rc<RefCell<TimbreState>>,
    timbre: Timbre,
) -> Result<(), AudioError> {
    log::info!("[audio] loading samples for {}", timbre);
    let result = engine.load_timbre(timbre).await;
    let mut s = state.borrow_mut();
    s.pending.remove(&timbre);
    match result {
        Ok(()) => {
            s.mark(timbre, LoadState::Loaded);
            log::info!("[audio] {} ready", timbre);
            Ok(())
        }
        Err(e) => {
            s.mark(timbre, LoadState::Failed);
            log::error!("[audio] loading {} failed: {}", timbre, e);
            Err(e)
        }
    }
}
