//! Remap parameter store: per-asset bounds and frame metadata.
//!
//! `VatMeta` is the persisted JSON record shipped next to a baked asset;
//! `VatParams` is the validated, immutable form the renderer works with.
//! Construction is the only place configuration errors are raised — playback
//! paths never re-validate.

use anyhow::{bail, Result};
use glam::Vec3;
use serde::Deserialize;

/// Row count assumed when no position texture is available to measure.
pub const DEFAULT_Y_RESOLUTION: f32 = 512.0;

fn default_frames() -> u32 {
    60
}
fn default_min() -> [f32; 3] {
    [-1.0, -1.0, -1.0]
}
fn default_max() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Persisted metadata record (format-stable). Field names match the exporter's
/// JSON; missing numeric fields take the documented defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct VatMeta {
    #[serde(rename = "Frames", default = "default_frames")]
    pub frames: u32,
    #[serde(rename = "Min", default = "default_min")]
    pub min: [f32; 3],
    #[serde(rename = "Max", default = "default_max")]
    pub max: [f32; 3],
    #[serde(rename = "Position", default)]
    pub position: Option<[f32; 3]>,
}

impl Default for VatMeta {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            min: default_min(),
            max: default_max(),
            position: None,
        }
    }
}

/// Validated per-asset playback parameters. Constructed once when an asset's
/// metadata is parsed, immutable thereafter; replaced wholesale on reload.
#[derive(Debug, Clone, Copy)]
pub struct VatParams {
    /// Per-axis lower bounds used to de-normalize position samples.
    pub min_values: Vec3,
    /// Per-axis upper bounds.
    pub max_values: Vec3,
    /// Total baked frame count. Always >= 1.
    pub frame_count: u32,
    /// Texture row count; the per-frame row offset is `1 / y_resolution`.
    pub y_resolution: f32,
    /// Optional world-space offset for the whole mesh instance.
    pub offset: Option<Vec3>,
}

impl VatParams {
    /// Build params from a metadata record, taking `y_resolution` from the
    /// loaded position texture's height when available.
    ///
    /// `frames == 0` is rejected. Inverted bounds (min > max on an axis) are
    /// a caller error: decoding proceeds without clamping and produces
    /// mirrored geometry, so we report and continue rather than fail.
    pub fn from_meta(meta: &VatMeta, texture_height: Option<u32>) -> Result<Self> {
        if meta.frames == 0 {
            bail!("VAT metadata: Frames must be >= 1");
        }
        let min_values = Vec3::from_array(meta.min);
        let max_values = Vec3::from_array(meta.max);
        for axis in 0..3 {
            if min_values[axis] > max_values[axis] {
                log::warn!(
                    "VAT metadata: inverted bounds on axis {} (min {} > max {}); geometry will mirror",
                    axis,
                    min_values[axis],
                    max_values[axis]
                );
            }
        }
        let y_resolution = match texture_height {
            Some(h) if h > 0 => h as f32,
            Some(_) => bail!("VAT position texture has zero height"),
            None => DEFAULT_Y_RESOLUTION,
        };
        Ok(Self {
            min_values,
            max_values,
            frame_count: meta.frames,
            y_resolution,
            offset: meta.position.map(Vec3::from_array),
        })
    }

    /// Vertical texture-space offset between adjacent frame rows.
    pub fn row_step(&self) -> f32 {
        1.0 / self.y_resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_frames_rejected() {
        let meta = VatMeta {
            frames: 0,
            ..VatMeta::default()
        };
        assert!(VatParams::from_meta(&meta, None).is_err());
    }

    #[test]
    fn inverted_bounds_still_construct() {
        let meta = VatMeta {
            min: [1.0, 0.0, 0.0],
            max: [-1.0, 1.0, 1.0],
            ..VatMeta::default()
        };
        let p = VatParams::from_meta(&meta, None).expect("construct");
        assert!(p.min_values.x > p.max_values.x);
    }

    #[test]
    fn y_resolution_prefers_texture_height() {
        let meta = VatMeta::default();
        let p = VatParams::from_meta(&meta, Some(128)).expect("construct");
        assert!((p.y_resolution - 128.0).abs() < f32::EPSILON);
        assert!((p.row_step() - 1.0 / 128.0).abs() < 1e-9);

        let p = VatParams::from_meta(&meta, None).expect("construct");
        assert!((p.y_resolution - DEFAULT_Y_RESOLUTION).abs() < f32::EPSILON);
    }
}
