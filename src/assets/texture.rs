//! VAT texture decode (CPU side).
//!
//! Baked textures ship as standalone PNGs next to the model. Samples are
//! data, not color: pixels are decoded to linear RGBA8 and must be uploaded
//! to a non-sRGB format, or the de-normalization bounds no longer apply.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// CPU-side pixel grid ready for GPU upload (tightly packed RGBA8).
pub struct TextureCpu {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Load a baked VAT texture. Row `f` of the image holds frame `f`'s
/// per-vertex samples; the image height is the asset's `y_resolution`.
pub fn load_vat_texture(path: &Path) -> Result<TextureCpu> {
    let img = image::open(path).with_context(|| format!("open VAT texture: {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        bail!("VAT texture {} is empty ({}x{})", path.display(), width, height);
    }
    Ok(TextureCpu {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}
