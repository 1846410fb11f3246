// Cube coordinate math and the tuning law of the grid.

use glam::Vec2;
use hexaphone_core::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn pixel_round_trip_recovers_cube() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let cube = Cube::axial(rng.gen_range(-200..200), rng.gen_range(-200..200));
        let scale = rng.gen_range(5.0..80.0_f32);
        let p = cube_to_pixel(scale, cube);
        assert_eq!(pixel_to_nearest_cube(scale, p), cube, "scale {scale}");
    }
}

#[test]
fn jittered_centers_stay_in_their_cell() {
    let mut rng = StdRng::seed_from_u64(11);
    let scale = 30.0;
    for _ in 0..2000 {
        let cube = Cube::axial(rng.gen_range(-20..20), rng.gen_range(-20..20));
        // well inside the inscribed circle of the hexagon
        let jitter = Vec2::new(rng.gen_range(-0.4..0.4), rng.gen_range(-0.4..0.4)) * scale;
        let p = cube_to_pixel(scale, cube) + jitter;
        assert_eq!(pixel_to_nearest_cube(scale, p), cube);
    }
}

#[test]
fn cube_round_always_sums_to_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..5000 {
        let a = rng.gen_range(-50.0..50.0_f32);
        let b = rng.gen_range(-50.0..50.0_f32);
        let cube = cube_round([a, b, -a - b]);
        assert!(cube.is_valid(), "{cube} from ({a}, {b})");
    }
}

#[test]
fn degenerate_inputs_map_to_origin() {
    let p = Vec2::new(120.0, -40.0);
    assert_eq!(pixel_to_nearest_cube(0.0, p), Cube::ORIGIN);
    assert_eq!(pixel_to_nearest_cube(-3.0, p), Cube::ORIGIN);
    assert_eq!(pixel_to_nearest_cube(f32::NAN, p), Cube::ORIGIN);
    assert_eq!(
        pixel_to_nearest_cube(20.0, Vec2::new(f32::INFINITY, 0.0)),
        Cube::ORIGIN
    );
}

#[test]
fn higher_beta_is_drawn_higher_on_screen() {
    let up = cube_to_pixel(20.0, Cube::axial(0, 1));
    assert!(up.y < 0.0);
    assert!((up.x - 20.0 * SQRT_3 * 0.5).abs() < 1e-4);
}

#[test]
fn origin_plays_concert_a() {
    assert_eq!(pitch_from_cube(Cube::ORIGIN), 440.0);
}

#[test]
fn alpha_gamma_difference_of_two_is_a_fifth() {
    // alpha+1, gamma-1 moves alpha-gamma by 2 with beta fixed: 2 * 3.5 = 7
    for alpha in -6..6 {
        for beta in -6..6 {
            let c = Cube::axial(alpha, beta);
            let next = Cube::axial(alpha + 1, beta);
            assert_eq!(semitones_from_cube(next) - semitones_from_cube(c), 7.0);
            let ratio = pitch_from_cube(next) / pitch_from_cube(c);
            assert!((ratio - 2f32.powf(7.0 / 12.0)).abs() < 1e-4);
        }
    }
}

#[test]
fn beta_step_is_a_major_third() {
    for alpha in -6..6 {
        for beta in -6..6 {
            let c = Cube::axial(alpha, beta);
            let up = Cube::axial(alpha, beta + 1);
            assert_eq!(semitones_from_cube(up) - semitones_from_cube(c), 4.0);
            assert!(pitch_from_cube(up) > pitch_from_cube(c));
        }
    }
}

#[test]
fn semitone_offsets_are_whole_numbers() {
    for alpha in -10..10 {
        for beta in -10..10 {
            let n = semitones_from_cube(Cube::axial(alpha, beta));
            assert_eq!(n, n.round());
        }
    }
}

#[test]
fn hexagon_corners_are_tip_radius_from_center() {
    let center = Vec2::new(50.0, 60.0);
    let corners = hexagon_corners(center, 20.0);
    for c in corners {
        assert!((c.distance(center) - 20.0).abs() < 1e-4);
    }
    assert_eq!(corners[0], Vec2::new(50.0, 80.0));
    assert_eq!(corners[3], Vec2::new(50.0, 40.0));
}

#[test]
fn neighbouring_centers_share_an_edge() {
    // adjacent pointed-top hexagons are sqrt(3) * r apart
    let scale = 25.0;
    let o = cube_to_pixel(scale, Cube::ORIGIN);
    for n in [
        Cube::axial(1, 0),
        Cube::axial(0, 1),
        Cube::axial(-1, 1),
        Cube::axial(-1, 0),
        Cube::axial(0, -1),
        Cube::axial(1, -1),
    ] {
        let d = cube_to_pixel(scale, n).distance(o);
        assert!((d - SQRT_3 * scale).abs() < 1e-3);
    }
}

#[test]
fn cube_display_lists_components() {
    assert_eq!(Cube::axial(2, -3).to_string(), "2/-3/1");
}
