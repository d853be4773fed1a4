//! CPU-side mesh helpers used to create simple vertex/index buffers.
//!
//! Only a ground plane lives here; playback geometry comes from the asset
//! loader and is never mutated after upload.

use crate::gfx::types::Vertex;
use wgpu::util::DeviceExt;

/// A large XZ plane centered at the origin.
pub fn create_plane(device: &wgpu::Device, extent: f32) -> (wgpu::Buffer, wgpu::Buffer, u32) {
    let e = extent;
    let verts = [
        Vertex {
            pos: [-e, 0.0, -e],
            nrm: [0.0, 1.0, 0.0],
        },
        Vertex {
            pos: [e, 0.0, -e],
            nrm: [0.0, 1.0, 0.0],
        },
        Vertex {
            pos: [e, 0.0, e],
            nrm: [0.0, 1.0, 0.0],
        },
        Vertex {
            pos: [-e, 0.0, e],
            nrm: [0.0, 1.0, 0.0],
        },
    ];
    let indices: [u16; 6] = [0, 2, 1, 0, 3, 2];
    let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("plane-vb"),
        contents: bytemuck::cast_slice(&verts),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("plane-ib"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    (vb, ib, indices.len() as u32)
}
