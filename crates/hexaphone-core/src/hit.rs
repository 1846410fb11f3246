use crate::geometry::pixel_to_nearest_cube;
use crate::layout::{HexCell, KeyboardLayout};
use glam::Vec2;

/// Cell covering the pixel `(x, y)`, or `None` outside the built range.
#[inline]
pub fn hit_test(layout: &KeyboardLayout, x: f32, y: f32) -> Option<&HexCell> {
    hit_test_point(layout, Vec2::new(x, y))
}

pub fn hit_test_point(layout: &KeyboardLayout, p: Vec2) -> Option<&HexCell> {
    if layout.is_empty() {
        return None;
    }
    let cube = pixel_to_nearest_cube(layout.scale(), p - layout.origin());
    layout.get(cube)
}
