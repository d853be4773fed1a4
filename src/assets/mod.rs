//! Asset system (CPU-side) for VAT playback.
//!
//! Loads the three pieces a baked asset ships as: a glTF mesh carrying the
//! per-vertex VAT lookup coordinate in TEXCOORD_1, one or two data textures
//! (position required, normal optional), and a small JSON metadata record.
//!
//! Design notes
//! - All mesh primitives in the file are flattened into a single mesh by
//!   appending vertices and re-indexing, so render wiring stays simple.
//! - TEXCOORD_1 is baked at export time and is not derivable from geometry;
//!   a mesh without it fails here, at load, never silently mid-frame.
//! - Failures carry file-path context; nothing in this module runs per-frame.

pub mod texture;

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::gfx::VertexVat;
use crate::vat::params::{VatMeta, VatParams};
use texture::{load_vat_texture, TextureCpu};

/// CPU-side mesh ready to be uploaded to GPU buffers.
pub struct MeshCpu {
    pub vertices: Vec<VertexVat>,
    pub indices: Vec<u32>,
}

/// Everything needed to build a playback material for one baked asset.
pub struct VatAsset {
    pub mesh: MeshCpu,
    pub position_tex: TextureCpu,
    pub normal_tex: Option<TextureCpu>,
    pub params: VatParams,
}

/// Load a `.gltf`/`.glb` mesh and merge all primitives into a single mesh.
///
/// Positions are required per primitive; normals fall back to a constant up
/// vector (the baked normal texture usually overrides them anyway). The VAT
/// lookup set (TEXCOORD_1) is required for every primitive.
pub fn load_vat_mesh(path: &Path) -> Result<MeshCpu> {
    let (doc, buffers, _images) = gltf::import(path)
        .with_context(|| format!("failed to import glTF: {}", path.display()))?;

    let mut vertices: Vec<VertexVat> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for mesh in doc.meshes() {
        for prim in mesh.primitives() {
            let reader = prim.reader(|buf| buffers.get(buf.index()).map(|b| b.0.as_slice()));

            let Some(pos_iter) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = pos_iter.collect();

            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|it| it.collect());

            // The lookup coordinate is the asset's baked addressing data, not
            // something we can invent from vertex positions.
            let lookups: Vec<[f32; 2]> = match reader.read_tex_coords(1) {
                Some(tc) => tc.into_f32().collect(),
                None => bail!(
                    "mesh {} has no TEXCOORD_1 attribute (VAT lookup); re-export with the VAT bake",
                    path.display()
                ),
            };
            if lookups.len() != positions.len() {
                bail!(
                    "mesh {}: TEXCOORD_1 count {} != position count {}",
                    path.display(),
                    lookups.len(),
                    positions.len()
                );
            }

            let start = vertices.len() as u32;
            for (i, p) in positions.iter().enumerate() {
                let n = normals
                    .as_ref()
                    .and_then(|ns| ns.get(i).copied())
                    .unwrap_or([0.0, 1.0, 0.0]);
                vertices.push(VertexVat {
                    pos: *p,
                    nrm: n,
                    lookup: lookups[i],
                });
            }

            match reader.read_indices() {
                Some(read) => indices.extend(read.into_u32().map(|i| start + i)),
                None => indices.extend(start..start + positions.len() as u32),
            }
        }
    }

    if vertices.is_empty() {
        bail!("glTF {} contains no usable primitives", path.display());
    }
    log::info!(
        "loaded VAT mesh {}: verts={}, indices={}",
        path.display(),
        vertices.len(),
        indices.len()
    );
    Ok(MeshCpu { vertices, indices })
}

/// Load and deserialize a VAT metadata JSON record.
pub fn load_vat_meta(path: &Path) -> Result<VatMeta> {
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("read VAT metadata: {}", path.display()))?;
    let meta: VatMeta = serde_json::from_str(&txt).context("parse VAT metadata json")?;
    Ok(meta)
}

/// Load a complete baked asset from a directory laid out as
/// `model.gltf` + `position.png` [+ `normal.png`] [+ `meta.json`].
pub fn load_vat_asset(dir: &Path) -> Result<VatAsset> {
    let mesh = load_vat_mesh(&dir.join("model.gltf"))?;
    let position_tex = load_vat_texture(&dir.join("position.png"))?;

    let normal_path = dir.join("normal.png");
    let normal_tex = if normal_path.exists() {
        Some(load_vat_texture(&normal_path)?)
    } else {
        // Supported state: the base pipeline's normal path stays in effect.
        log::info!(
            "no normal texture at {}; using mesh normals",
            normal_path.display()
        );
        None
    };

    let meta_path = dir.join("meta.json");
    let meta = if meta_path.exists() {
        load_vat_meta(&meta_path)?
    } else {
        log::warn!(
            "no metadata at {}; using defaults (Frames=60, Min=-1, Max=1)",
            meta_path.display()
        );
        VatMeta::default()
    };

    let params = VatParams::from_meta(&meta, Some(position_tex.height))?;
    Ok(VatAsset {
        mesh,
        position_tex,
        normal_tex,
        params,
    })
}
