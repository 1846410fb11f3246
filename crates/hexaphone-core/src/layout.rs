//! Key layout generation.
//!
//! A `KeyboardLayout` is built in one go for a given viewport, scale, tonality
//! and palette, and is never mutated afterwards. Rebuilding produces a fresh
//! layout which the owner swaps in wholesale.

use crate::constants::{
    DEFAULT_LINE_COLOR, KEYS_ON_LONG_SIDE, MIN_KEY_SCALE, MUTED_FILL_COLOR, ROW_SPACING,
    SPARE_CELLS, SQRT_3, STROKE_RATIO,
};
use crate::geometry::{cube_to_pixel, pitch_from_cube, Cube};
use crate::music::{hz_to_midi, is_in_key, KeyLabels, Tonality};
use fnv::FnvHashMap;
use glam::Vec2;
use std::fmt;
use std::rc::Rc;

/// Label callback: `(frequency_hz, cube) -> text`.
pub type LabelFn = Rc<dyn Fn(f32, Cube) -> String>;
/// Color callback: `(frequency_hz, center_px, cube) -> css color`.
pub type ColorFn = Rc<dyn Fn(f32, Vec2, Cube) -> String>;

/// Caller-supplied visual rules applied to every cell at build time.
#[derive(Clone)]
pub struct Palette {
    pub label: LabelFn,
    pub fill: ColorFn,
    pub line: ColorFn,
}

impl Palette {
    pub fn with_labels(labels: KeyLabels) -> Self {
        Self {
            label: Rc::new(move |f: f32, _: Cube| labels.label(f)),
            ..Self::default()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            label: Rc::new(|f: f32, _: Cube| KeyLabels::default().label(f)),
            fill: Rc::new(default_fill_color),
            line: Rc::new(default_line_color),
        }
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Palette { .. }")
    }
}

/// Hue follows the pitch class, lightness the octave.
pub fn default_fill_color(frequency_hz: f32, _center: Vec2, _cube: Cube) -> String {
    let midi = hz_to_midi(frequency_hz);
    let hue = midi.rem_euclid(12) * 30;
    let octave = midi.div_euclid(12) - 1;
    let lightness = (30 + (octave - 2) * 8).clamp(22, 72);
    format!("hsl({hue}, 62%, {lightness}%)")
}

pub fn default_line_color(_frequency_hz: f32, _center: Vec2, _cube: Cube) -> String {
    DEFAULT_LINE_COLOR.to_string()
}

/// One key of the instrument.
#[derive(Clone, Debug, PartialEq)]
pub struct HexCell {
    pub cube: Cube,
    pub center: Vec2,
    pub tip_radius: f32,
    pub stroke_width: f32,
    pub frequency_hz: f32,
    pub label: String,
    pub fill: String,
    pub stroke: String,
    /// Out-of-tonality cells stay in the grid but never sound.
    pub playable: bool,
}

#[derive(Clone, Debug, Default)]
pub struct KeyboardLayout {
    cells: Vec<HexCell>,
    index: FnvHashMap<Cube, usize>,
    origin: Vec2,
    scale: f32,
    tonality: Option<Tonality>,
}

impl KeyboardLayout {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cells in build order (row by row, bottom to top in cube space).
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    pub fn get(&self, cube: Cube) -> Option<&HexCell> {
        self.index.get(&cube).and_then(|&i| self.cells.get(i))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pixel position of the origin cell's center.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn tonality(&self) -> Option<Tonality> {
        self.tonality
    }
}

/// Number of keys per row and rows needed to cover a viewport at `scale`.
pub fn viewport_grid(width: f32, height: f32, scale: f32) -> (i32, i32) {
    if scale.is_nan() || scale <= 0.0 {
        return (0, 0);
    }
    let across = (width.max(0.0) / (scale * SQRT_3)).ceil() as i32;
    let down = (height.max(0.0) / (scale * ROW_SPACING)).ceil() as i32;
    (
        across.saturating_add(2 * SPARE_CELLS),
        down.saturating_add(2 * SPARE_CELLS),
    )
}

/// Tip radius for a viewport, unless `fixed` overrides it.
pub fn key_scale(width: f32, height: f32, fixed: Option<f32>) -> f32 {
    match fixed {
        Some(s) if s.is_finite() && s > 0.0 => s.max(MIN_KEY_SCALE),
        _ => (width.max(height) / (KEYS_ON_LONG_SIDE * SQRT_3)).max(MIN_KEY_SCALE),
    }
}

/// Rounds halves toward positive infinity.
#[inline]
fn round_half_up(x: f32) -> i32 {
    (x + 0.5).floor() as i32
}

pub struct LayoutBuilder {
    keys_per_row: i32,
    rows: i32,
    scale: f32,
    origin: Vec2,
    tonality: Option<Tonality>,
    palette: Palette,
}

impl LayoutBuilder {
    pub fn new(keys_per_row: i32, rows: i32, scale: f32) -> Self {
        Self {
            keys_per_row,
            rows,
            scale,
            origin: Vec2::ZERO,
            tonality: None,
            palette: Palette::default(),
        }
    }

    /// Builder sized to cover a `width` x `height` viewport centered on the
    /// origin cell.
    pub fn for_viewport(width: f32, height: f32, scale: f32) -> Self {
        let (keys_per_row, rows) = viewport_grid(width, height, scale);
        Self::new(keys_per_row, rows, scale).origin(Vec2::new(width * 0.5, height * 0.5))
    }

    pub fn origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn tonality(mut self, tonality: Option<Tonality>) -> Self {
        self.tonality = tonality;
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn build(self) -> KeyboardLayout {
        let Self {
            keys_per_row,
            rows,
            scale,
            origin,
            tonality,
            palette,
        } = self;

        let beta_min = round_half_up(-rows as f32 / 2.0);
        let beta_max = round_half_up(rows as f32 / 2.0);
        let capacity = (keys_per_row.max(0) as usize).saturating_mul(rows.max(0) as usize);
        let mut cells = Vec::with_capacity(capacity);
        let mut index = FnvHashMap::with_capacity_and_hasher(capacity, Default::default());

        for beta in beta_min..beta_max {
            let shift = beta as f32 * 0.5;
            let alpha_min = round_half_up(-keys_per_row as f32 / 2.0 - shift);
            let alpha_max = round_half_up(keys_per_row as f32 / 2.0 - shift);
            for alpha in alpha_min..alpha_max {
                let cube = Cube::axial(alpha, beta);
                let frequency_hz = pitch_from_cube(cube);
                let center = origin + cube_to_pixel(scale, cube);
                let playable = is_in_key(frequency_hz, tonality.as_ref());
                let stroke = (palette.line)(frequency_hz, center, cube);
                let (fill, label) = if playable {
                    (
                        (palette.fill)(frequency_hz, center, cube),
                        (palette.label)(frequency_hz, cube),
                    )
                } else {
                    (MUTED_FILL_COLOR.to_string(), String::new())
                };
                index.insert(cube, cells.len());
                cells.push(HexCell {
                    cube,
                    center,
                    tip_radius: scale,
                    stroke_width: scale * STROKE_RATIO,
                    frequency_hz,
                    label,
                    fill,
                    stroke,
                    playable,
                });
            }
        }

        KeyboardLayout {
            cells,
            index,
            origin,
            scale,
            tonality,
        }
    }
}
