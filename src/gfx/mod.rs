//! gfx: wgpu renderer hosting the VAT playback material.
//!
//! This module wraps wgpu initialization and draws a minimal scene: a ground
//! plane plus one baked asset playing back through its VAT material. It is
//! split into focused files so the structure resembles a codebase you could
//! extend into a full client.
//!
//! Files
//! - camera.rs: orbit camera and view/projection helpers
//! - types.rs: POD buffer structs and vertex layouts (Globals/Model/VatUniform)
//! - mesh.rs: CPU-side helper geometry (ground plane)
//! - inject.rs: per-instance shader composition (the two VAT splice points)
//! - pipeline.rs: pipelines, bind-group layouts, shader modules
//! - material.rs: the playback material (textures, uniform snapshot, update)
//! - util.rs: small helpers (surface clamp, depth view)

mod camera;
pub mod inject;
pub mod material;
mod mesh;
pub mod pipeline;
pub mod types;
mod util;

pub use material::VatMaterial;
pub use types::{Vertex, VertexVat};

use anyhow::{Context, Result};
use camera::Camera;
use std::path::Path;
use std::time::Instant;
use types::{Globals, Model};
use util::{create_depth_view, scale_to_max};

use crate::assets::load_vat_asset;

use wgpu::util::DeviceExt;
use wgpu::{rwh::HasDisplayHandle, rwh::HasWindowHandle, SurfaceError, SurfaceTargetUnsafe};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Renderer owns the GPU state and per-scene resources.
///
/// The intent is that a higher-level loop owns a `Renderer` and calls
/// `resize` and `render` based on window events; playback controls reach the
/// material through the public field.
pub struct Renderer {
    // --- GPU & Surface ---
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    max_dim: u32,
    depth: wgpu::TextureView,

    // --- Static path (ground plane) ---
    plane_pipeline: wgpu::RenderPipeline,
    globals_bg: wgpu::BindGroup,
    plane_model_bg: wgpu::BindGroup,
    globals_buf: wgpu::Buffer,
    _plane_model_buf: wgpu::Buffer,
    plane_vb: wgpu::Buffer,
    plane_ib: wgpu::Buffer,
    plane_index_count: u32,

    // --- Playback asset ---
    pub material: VatMaterial,
    mesh_model_bg: wgpu::BindGroup,
    _mesh_model_buf: wgpu::Buffer,
    mesh_vb: wgpu::Buffer,
    mesh_ib: wgpu::Buffer,
    mesh_index_count: u32,

    // --- Timing ---
    start: Instant,
    last_time: f32,
    cam_target: glam::Vec3,
}

impl Renderer {
    /// Create the renderer and load the baked asset from `asset_dir`
    /// (`model.gltf` + `position.png` [+ `normal.png`] [+ `meta.json`]).
    pub async fn new(window: &Window, asset_dir: &Path) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        // Create a surface without borrowing `window` for its lifetime.
        let raw_display = window.display_handle()?.as_raw();
        let raw_window = window.window_handle()?.as_raw();
        let surface = unsafe {
            instance.create_surface_unsafe(SurfaceTargetUnsafe::RawHandle {
                raw_display_handle: raw_display,
                raw_window_handle: raw_window,
            })
        }?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
            })
            .await
            .context("request adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vatplay-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
            })
            .await
            .context("request device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let max_dim = device.limits().max_texture_dimension_2d.max(1);
        let (width, height) = scale_to_max((size.width, size.height), max_dim);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth = create_depth_view(&device, config.width, config.height);

        // BGLs + globals
        let (globals_bgl, model_bgl) = pipeline::create_bind_group_layouts(&device);
        let globals_init = Globals {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            time_pad: [0.0; 4],
        };
        let globals_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&globals_init),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals-bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            }],
        });

        // Ground plane
        let shader = pipeline::create_shader(&device);
        let plane_pipeline =
            pipeline::create_plane_pipeline(&device, &shader, &globals_bgl, &model_bgl, format);
        let (plane_vb, plane_ib, plane_index_count) = mesh::create_plane(&device, 20.0);
        let plane_model = Model {
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            normal_matrix: glam::Mat4::IDENTITY.to_cols_array_2d(),
            color: [0.22, 0.26, 0.24],
            emissive: 0.0,
        };
        let plane_model_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane-model"),
            contents: bytemuck::bytes_of(&plane_model),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let plane_model_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane-model-bg"),
            layout: &model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: plane_model_buf.as_entire_binding(),
            }],
        });

        // Baked asset + playback material
        let asset = load_vat_asset(asset_dir)?;
        let mesh_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vat-mesh-vb"),
            contents: bytemuck::cast_slice(&asset.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let mesh_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vat-mesh-ib"),
            contents: bytemuck::cast_slice(&asset.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let mesh_index_count = asset.mesh.indices.len() as u32;

        // The optional whole-mesh offset folds into the model matrix; it is a
        // world-space translation, not part of the per-vertex decode.
        let model_mtx =
            glam::Mat4::from_translation(asset.params.offset.unwrap_or(glam::Vec3::ZERO));
        let normal_mtx =
            glam::Mat4::from_mat3(glam::Mat3::from_mat4(model_mtx).inverse().transpose());
        let mesh_model = Model {
            model: model_mtx.to_cols_array_2d(),
            normal_matrix: normal_mtx.to_cols_array_2d(),
            color: [0.78, 0.72, 0.62],
            emissive: 0.0,
        };
        let mesh_model_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vat-mesh-model"),
            contents: bytemuck::bytes_of(&mesh_model),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let mesh_model_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vat-mesh-model-bg"),
            layout: &model_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mesh_model_buf.as_entire_binding(),
            }],
        });

        let material =
            VatMaterial::new(&device, &queue, &globals_bgl, &model_bgl, format, &asset)?;
        log::info!(
            "VAT asset ready: frames={}, rows={}, normal={}",
            material.params.frame_count,
            material.params.y_resolution,
            material.has_normal()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            max_dim,
            depth,
            plane_pipeline,
            globals_bg,
            plane_model_bg,
            globals_buf,
            _plane_model_buf: plane_model_buf,
            plane_vb,
            plane_ib,
            plane_index_count,
            material,
            mesh_model_bg,
            _mesh_model_buf: mesh_model_buf,
            mesh_vb,
            mesh_ib,
            mesh_index_count,
            start: Instant::now(),
            last_time: 0.0,
            cam_target: glam::Vec3::new(0.0, 1.0, 0.0),
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let (w, h) = scale_to_max((new_size.width, new_size.height), self.max_dim);
        self.config.width = w.max(1);
        self.config.height = h.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth = create_depth_view(&self.device, self.config.width, self.config.height);
    }

    pub fn render(&mut self) -> Result<(), SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Update globals (camera + time)
        let t = self.start.elapsed().as_secs_f32();
        let dt = (t - self.last_time).max(0.0);
        self.last_time = t;
        let aspect = self.config.width as f32 / self.config.height as f32;
        let cam = Camera::orbit(self.cam_target, 6.5, t * 0.25, aspect);
        let globals = Globals {
            view_proj: cam.view_proj().to_cols_array_2d(),
            time_pad: [t, 0.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buf, 0, bytemuck::bytes_of(&globals));

        // Advance the playback clock and push one complete uniform snapshot.
        self.material.playback.advance(dt);
        self.material.update(&self.queue);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            use wgpu::*;
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("main-pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color {
                            r: 0.02,
                            g: 0.08,
                            b: 0.16,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Ground plane
            rpass.set_pipeline(&self.plane_pipeline);
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            rpass.set_bind_group(1, &self.plane_model_bg, &[]);
            rpass.set_vertex_buffer(0, self.plane_vb.slice(..));
            rpass.set_index_buffer(self.plane_ib.slice(..), IndexFormat::Uint16);
            rpass.draw_indexed(0..self.plane_index_count, 0, 0..1);

            // Playback mesh. Bind groups: 0=globals, 1=model, 2=vat
            rpass.set_pipeline(&self.material.pipeline);
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            rpass.set_bind_group(1, &self.mesh_model_bg, &[]);
            rpass.set_bind_group(2, &self.material.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.mesh_vb.slice(..));
            rpass.set_index_buffer(self.mesh_ib.slice(..), IndexFormat::Uint32);
            rpass.draw_indexed(0..self.mesh_index_count, 0, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
