//! CPU reference for the per-vertex decode/remap chain.
//!
//! The WGSL in `gfx/vat.wgsl` is a transcription of these functions; they are
//! the source of truth for the math and the thing the test suite exercises.
//! Nothing here is on the render path — per-draw decoding happens on the GPU.

use glam::{Mat3, Vec2, Vec3};

use crate::assets::texture::TextureCpu;
use crate::vat::timebase::FrameCursor;

/// Fetch one texel as a normalized `[0,1]` RGB triple (nearest, clamped).
pub fn fetch_texel(tex: &TextureCpu, x: u32, y: u32) -> Vec3 {
    let x = x.min(tex.width - 1);
    let y = y.min(tex.height - 1);
    let i = ((y * tex.width + x) * 4) as usize;
    Vec3::new(
        tex.pixels[i] as f32 / 255.0,
        tex.pixels[i + 1] as f32 / 255.0,
        tex.pixels[i + 2] as f32 / 255.0,
    )
}

/// Nearest-neighbour sample at a `[0,1]²` coordinate. Matches the GPU's
/// non-filtering sampler: no blending across rows or columns.
pub fn sample_nearest(tex: &TextureCpu, uv: Vec2) -> Vec3 {
    let x = (uv.x * tex.width as f32).floor().max(0.0) as u32;
    let y = (uv.y * tex.height as f32).floor().max(0.0) as u32;
    fetch_texel(tex, x, y)
}

/// Lookup coordinate shifted down to frame `f`'s row. Row 0 is the texture's
/// top row; the ordering is a fixed contract with the exporter.
pub fn frame_uv(lookup: Vec2, frame: u32, row_step: f32) -> Vec2 {
    Vec2::new(lookup.x, lookup.y + frame as f32 * row_step)
}

/// Decode one interpolated position sample (still normalized `[0,1]³`).
pub fn decode_position(tex: &TextureCpu, lookup: Vec2, cursor: &FrameCursor, row_step: f32) -> Vec3 {
    let a = sample_nearest(tex, frame_uv(lookup, cursor.current, row_step));
    let b = sample_nearest(tex, frame_uv(lookup, cursor.next, row_step));
    a.lerp(b, cursor.blend)
}

/// Decode one interpolated normal sample: unpack `[0,1] -> [-1,1]` per frame,
/// then interpolate. Result is object-space before axis correction and is not
/// yet unit length.
pub fn decode_normal(tex: &TextureCpu, lookup: Vec2, cursor: &FrameCursor, row_step: f32) -> Vec3 {
    let a = sample_nearest(tex, frame_uv(lookup, cursor.current, row_step)) * 2.0 - 1.0;
    let b = sample_nearest(tex, frame_uv(lookup, cursor.next, row_step)) * 2.0 - 1.0;
    a.lerp(b, cursor.blend)
}

/// Fixed authoring-axis correction: the exporter bakes right-handed Z-up,
/// the renderer is right-handed Y-up. Source axis 1 becomes depth (negated),
/// axis 2 becomes up, axis 0 stays right.
pub fn axis_correct(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// Inverse of [`axis_correct`], used by the inverse affine map in tests.
pub fn axis_correct_inv(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

/// Map a normalized `[0,1]³` sample into object space: per-channel affine
/// de-normalization against the bounds, then the axis correction.
pub fn remap_position(s: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    axis_correct(min + s * (max - min))
}

/// Inverse affine map: recover the normalized sample from an object-space
/// position. Degenerate axes (min == max) map to 0.
pub fn normalize_position(p: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    let src = axis_correct_inv(p) - min;
    let extent = max - min;
    Vec3::new(
        if extent.x != 0.0 { src.x / extent.x } else { 0.0 },
        if extent.y != 0.0 { src.y / extent.y } else { 0.0 },
        if extent.z != 0.0 { src.z / extent.z } else { 0.0 },
    )
}

/// Finish a decoded normal: axis-correct, transform by the model's
/// normal-correction matrix (inverse-transpose, so non-uniform scale keeps
/// normals perpendicular), then re-normalize to unit length.
pub fn remap_normal(n: Vec3, normal_matrix: Mat3) -> Vec3 {
    (normal_matrix * axis_correct(n)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_correction_roundtrip() {
        let v = Vec3::new(0.3, -1.7, 4.2);
        assert!((axis_correct_inv(axis_correct(v)) - v).length() < 1e-7);
        assert!((axis_correct(axis_correct_inv(v)) - v).length() < 1e-7);
    }

    #[test]
    fn axis_correction_maps_up_axis() {
        // Exporter's up (source z) must land on the renderer's up (y).
        let up = axis_correct(Vec3::new(0.0, 0.0, 1.0));
        assert!((up - Vec3::Y).length() < 1e-7);
        // Source y becomes negative depth.
        let depth = axis_correct(Vec3::new(0.0, 1.0, 0.0));
        assert!((depth - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-7);
    }
}
