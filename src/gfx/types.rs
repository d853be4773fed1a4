//! Buffer/vertex types shared across pipelines.
//!
//! All types here are `#[repr(C)]` and `bytemuck`-safe so they can be uploaded to GPU buffers
//! without extra copies. Layouts mirror the WGSL structs field-for-field; vec3
//! members carry explicit std140 padding.

use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub time_pad: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Model {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model's upper 3x3, padded out to a mat4 so
    /// the uniform layout stays column-aligned.
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub emissive: f32,
}

/// Per-draw VAT uniform snapshot. Written whole, once per displayed frame;
/// every vertex invocation of that draw reads the same immutable copy.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct VatUniform {
    pub min_values: [f32; 3],
    /// Row index of the current frame (selector output, as float for the shader).
    pub frame_a: f32,
    pub max_values: [f32; 3],
    /// Row index of the frame being blended toward.
    pub frame_b: f32,
    /// `1 / y_resolution`: vertical texture-space step between frame rows.
    pub row_step: f32,
    /// Blend factor in `[0, 1)`; 0 in manual mode.
    pub blend: f32,
    pub _pad: [f32; 2], // std140 padding
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
}

/// Mesh vertex for VAT playback: rest pose + rest normal + the baked lookup
/// coordinate (glTF TEXCOORD_1) addressing this vertex's column in every
/// frame row.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct VertexVat {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
    pub lookup: [f32; 2],
}

impl VertexVat {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<VertexVat>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
    };
}
