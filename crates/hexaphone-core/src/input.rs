//! Pointer and touch dispatch.
//!
//! The dispatcher owns the per-surface gesture state and turns raw input
//! samples into batches of pitches. It never plays anything itself; the
//! board forwards the batches to audio and to subscribers.

use crate::constants::DRAG_SAMPLE_RATE_MS;
use crate::geometry::Cube;
use crate::hit::hit_test;
use crate::layout::KeyboardLayout;
use fnv::FnvHashMap;
use smallvec::SmallVec;

/// Pitches triggered at one instant.
pub type PitchBatch = SmallVec<[f32; 8]>;

/// One finger on the surface, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { last_sample_ms: f64 },
}

/// Bookkeeping for an active touch point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSession {
    pub last_sample_ms: f64,
    pub last_cell: Option<Cube>,
}

#[derive(Debug)]
pub struct InputDispatcher {
    drag: DragState,
    sample_rate_ms: f64,
    touches: FnvHashMap<i32, TouchSession>,
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new(DRAG_SAMPLE_RATE_MS)
    }
}

impl InputDispatcher {
    pub fn new(sample_rate_ms: f64) -> Self {
        Self {
            drag: DragState::Idle,
            sample_rate_ms: sample_rate_ms.max(0.0),
            touches: FnvHashMap::default(),
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn touch_session(&self, id: i32) -> Option<&TouchSession> {
        self.touches.get(&id)
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn pointer_down(&mut self, now_ms: f64) {
        self.drag = DragState::Dragging {
            last_sample_ms: now_ms,
        };
    }

    /// Samples the pointer while dragging, at most once per sample interval.
    pub fn pointer_move(
        &mut self,
        layout: &KeyboardLayout,
        x: f32,
        y: f32,
        now_ms: f64,
    ) -> Option<PitchBatch> {
        let DragState::Dragging { last_sample_ms } = self.drag else {
            return None;
        };
        if now_ms - last_sample_ms < self.sample_rate_ms {
            return None;
        }
        self.drag = DragState::Dragging {
            last_sample_ms: now_ms,
        };
        non_empty(playable_pitch(layout, x, y).into_iter().collect())
    }

    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// A plain click is sampled immediately, regardless of the drag limiter.
    pub fn click(&self, layout: &KeyboardLayout, x: f32, y: f32) -> Option<PitchBatch> {
        non_empty(playable_pitch(layout, x, y).into_iter().collect())
    }

    /// A finger landed. `points` holds every finger on the surface; new ones
    /// get a session, fingers already down keep theirs, and all are sampled.
    pub fn touch_start(
        &mut self,
        layout: &KeyboardLayout,
        points: &[TouchPoint],
        now_ms: f64,
    ) -> Option<PitchBatch> {
        self.sample_touches(layout, points, now_ms)
    }

    /// Samples every active finger; no rate limiting on this path.
    pub fn touch_move(
        &mut self,
        layout: &KeyboardLayout,
        points: &[TouchPoint],
        now_ms: f64,
    ) -> Option<PitchBatch> {
        self.sample_touches(layout, points, now_ms)
    }

    pub fn touch_end(&mut self, ids: &[i32]) {
        for id in ids {
            self.touches.remove(id);
        }
    }

    fn sample_touches(
        &mut self,
        layout: &KeyboardLayout,
        points: &[TouchPoint],
        now_ms: f64,
    ) -> Option<PitchBatch> {
        let mut batch = PitchBatch::new();
        for p in points {
            let cell = hit_test(layout, p.x, p.y);
            let session = self.touches.entry(p.id).or_insert(TouchSession {
                last_sample_ms: now_ms,
                last_cell: None,
            });
            session.last_sample_ms = now_ms;
            session.last_cell = cell.map(|c| c.cube);
            if let Some(c) = cell.filter(|c| c.playable) {
                batch.push(c.frequency_hz);
            }
        }
        non_empty(batch)
    }
}

#[inline]
fn playable_pitch(layout: &KeyboardLayout, x: f32, y: f32) -> Option<f32> {
    hit_test(layout, x, y)
        .filter(|c| c.playable)
        .map(|c| c.frequency_hz)
}

#[inline]
fn non_empty(batch: PitchBatch) -> Option<PitchBatch> {
    (!batch.is_empty()).then_some(batch)
}
