//! Pointed-top hexagon math in cube coordinates.
//!
//! Every cell is addressed by three integers `(alpha, beta, gamma)` summing to
//! zero. `alpha` runs to the right, `beta` runs up-right, `gamma` is derived.
//! Pixel positions returned here are relative to the origin cell's center;
//! callers add their own viewport origin.

use crate::constants::{
    A4_HZ, ROW_SPACING, SEMITONES_PER_ALPHA_GAMMA, SEMITONES_PER_BETA, SQRT_3,
};
use crate::music::frequency_nth_tone;
use glam::Vec2;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cube {
    pub alpha: i32,
    pub beta: i32,
    pub gamma: i32,
}

impl Cube {
    pub const ORIGIN: Cube = Cube {
        alpha: 0,
        beta: 0,
        gamma: 0,
    };

    /// Cube from its two axial components; `gamma` is derived.
    #[inline]
    pub fn axial(alpha: i32, beta: i32) -> Self {
        Self {
            alpha,
            beta,
            gamma: -alpha - beta,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.alpha + self.beta + self.gamma == 0
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.alpha, self.beta, self.gamma)
    }
}

/// Center of `cube` in pixels, relative to the origin cell.
#[inline]
pub fn cube_to_pixel(scale: f32, cube: Cube) -> Vec2 {
    let x = scale * SQRT_3 * (cube.alpha as f32 + cube.beta as f32 * 0.5);
    let y = -scale * ROW_SPACING * cube.beta as f32;
    Vec2::new(x, y)
}

/// Fractional cube coordinates of a pixel position (inverse of `cube_to_pixel`).
#[inline]
pub fn pixel_to_fractional(scale: f32, p: Vec2) -> [f32; 3] {
    let beta = -p.y / (scale * ROW_SPACING);
    let alpha = p.x / (scale * SQRT_3) - beta * 0.5;
    [alpha, beta, -alpha - beta]
}

/// Rounds fractional cube coordinates to the containing cell.
///
/// All three components are rounded, then the one that moved furthest is
/// recomputed from the other two so the result still sums to zero.
pub fn cube_round(frac: [f32; 3]) -> Cube {
    let [fa, fb, fg] = frac;
    let mut a = fa.round();
    let mut b = fb.round();
    let mut g = fg.round();
    let da = (a - fa).abs();
    let db = (b - fb).abs();
    let dg = (g - fg).abs();
    if da > db && da > dg {
        a = -b - g;
    } else if db > dg {
        b = -a - g;
    } else {
        g = -a - b;
    }
    Cube {
        alpha: a as i32,
        beta: b as i32,
        gamma: g as i32,
    }
}

/// Cell whose hexagon contains the pixel. Degenerate scales map everything to
/// the origin cell.
pub fn pixel_to_nearest_cube(scale: f32, p: Vec2) -> Cube {
    if scale.is_nan() || scale <= 0.0 || !p.is_finite() {
        return Cube::ORIGIN;
    }
    cube_round(pixel_to_fractional(scale, p))
}

/// Semitone offset of `cube` relative to A4.
#[inline]
pub fn semitones_from_cube(cube: Cube) -> f32 {
    SEMITONES_PER_ALPHA_GAMMA * (cube.alpha - cube.gamma) as f32
        + SEMITONES_PER_BETA * cube.beta as f32
}

/// The tuning law of the grid: `440 * 2^(n/12)` with
/// `n = 3.5 * (alpha - gamma) + 0.5 * beta`.
#[inline]
pub fn pitch_from_cube(cube: Cube) -> f32 {
    frequency_nth_tone(A4_HZ, semitones_from_cube(cube))
}

/// Vertices of a pointed-top hexagon, starting at the bottom tip and going
/// counter-clockwise on screen.
pub fn hexagon_corners(center: Vec2, tip_radius: f32) -> [Vec2; 6] {
    let half_width = tip_radius * SQRT_3 * 0.5; // r * cos(30°)
    let shoulder = tip_radius * 0.5; // r * sin(30°)
    let Vec2 { x, y } = center;
    [
        Vec2::new(x, y + tip_radius),
        Vec2::new(x + half_width, y + shoulder),
        Vec2::new(x + half_width, y - shoulder),
        Vec2::new(x, y - tip_radius),
        Vec2::new(x - half_width, y - shoulder),
        Vec2::new(x - half_width, y + shoulder),
    ]
}
