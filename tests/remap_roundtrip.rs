use glam::{Mat3, Vec2, Vec3};
use vatplay::assets::texture::TextureCpu;
use vatplay::vat::sample::{
    decode_normal, decode_position, normalize_position, remap_normal, remap_position,
};
use vatplay::vat::timebase::FrameCursor;

#[test]
fn remap_roundtrip_recovers_sample() {
    let cases = [
        (Vec3::new(0.0, 0.0, 0.0), Vec3::new(-1.0, -1.0, -1.0), Vec3::ONE),
        (Vec3::new(1.0, 1.0, 1.0), Vec3::new(-2.5, 0.0, 3.0), Vec3::new(4.0, 1.0, 9.0)),
        (Vec3::new(0.25, 0.75, 0.5), Vec3::new(-10.0, -0.5, 2.0), Vec3::new(10.0, 0.5, 8.0)),
        (Vec3::new(0.9, 0.1, 0.3), Vec3::splat(-0.01), Vec3::splat(0.01)),
    ];
    for (s, min, max) in cases {
        let p = remap_position(s, min, max);
        let back = normalize_position(p, min, max);
        assert!(
            (back - s).length() < 1e-5,
            "roundtrip drifted: {s:?} -> {p:?} -> {back:?}"
        );
    }
}

#[test]
fn midpoint_decodes_to_origin() {
    let p = remap_position(Vec3::splat(0.5), Vec3::splat(-1.0), Vec3::ONE);
    assert!(p.length() < 1e-6, "midpoint should be identity: {p:?}");
}

#[test]
fn axis_convention_swaps_up_and_depth() {
    // Unit bounds so the de-normalized value equals the sample.
    let min = Vec3::ZERO;
    let max = Vec3::ONE;
    // Source up (axis 2) lands on renderer up (y).
    let p = remap_position(Vec3::new(0.0, 0.0, 1.0), min, max);
    assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
    // Source axis 1 lands on depth, negated.
    let p = remap_position(Vec3::new(0.0, 1.0, 0.0), min, max);
    assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    // Source axis 0 stays on the right axis.
    let p = remap_position(Vec3::new(1.0, 0.0, 0.0), min, max);
    assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
}

/// One-texel-wide grid: row 0 and row 1 are two baked frames for one vertex.
fn two_frame_texture(row0: [u8; 3], row1: [u8; 3]) -> TextureCpu {
    TextureCpu {
        pixels: vec![
            row0[0], row0[1], row0[2], 255,
            row1[0], row1[1], row1[2], 255,
        ],
        width: 1,
        height: 2,
    }
}

#[test]
fn decode_position_blends_adjacent_rows() {
    let tex = two_frame_texture([0, 51, 102], [255, 153, 51]);
    let lookup = Vec2::new(0.5, 0.25); // center of row 0
    let row_step = 1.0 / tex.height as f32;

    let at = |blend: f32| {
        decode_position(
            &tex,
            lookup,
            &FrameCursor { current: 0, next: 1, blend },
            row_step,
        )
    };

    let a = at(0.0);
    let b = at(1.0);
    let expect_a = Vec3::new(0.0, 51.0 / 255.0, 102.0 / 255.0);
    let expect_b = Vec3::new(1.0, 153.0 / 255.0, 51.0 / 255.0);
    assert!((a - expect_a).length() < 1e-6);
    assert!((b - expect_b).length() < 1e-6);

    let mid = at(0.5);
    assert!((mid - (expect_a + expect_b) * 0.5).length() < 1e-6);
}

#[test]
fn decoded_normal_is_unit_length_for_any_blend() {
    // Row 0 encodes +x, row 1 encodes +z (packed [0,1] -> [-1,1]).
    let tex = two_frame_texture([255, 128, 128], [128, 128, 255]);
    let lookup = Vec2::new(0.5, 0.25);
    let row_step = 0.5;

    // Non-uniform model scale: normal matrix is the inverse-transpose.
    let normal_matrix = Mat3::from_diagonal(Vec3::new(1.0, 2.0, 0.5))
        .inverse()
        .transpose();

    for blend in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let decoded = decode_normal(
            &tex,
            lookup,
            &FrameCursor { current: 0, next: 1, blend },
            row_step,
        );
        let n = remap_normal(decoded, normal_matrix);
        assert!(
            (n.length() - 1.0).abs() < 1e-5,
            "normal not unit at blend {blend}: |n| = {}",
            n.length()
        );
    }
}

#[test]
fn manual_cursor_reads_a_single_row() {
    let tex = two_frame_texture([10, 20, 30], [200, 210, 220]);
    let lookup = Vec2::new(0.5, 0.25);
    let cursor = FrameCursor { current: 1, next: 1, blend: 0.0 };
    let s = decode_position(&tex, lookup, &cursor, 0.5);
    let expect = Vec3::new(200.0 / 255.0, 210.0 / 255.0, 220.0 / 255.0);
    assert!((s - expect).length() < 1e-6);
}
