//! Playback material: textures, uniform snapshot, and the composed pipeline
//! for one baked asset.
//!
//! Each instance owns its composed shader module and pipeline, so creating a
//! material never touches state shared with other instances. The per-frame
//! `update` runs the frame selector host-side and writes one complete uniform
//! snapshot; on a selector error it holds the last good snapshot instead of
//! pushing garbage.

use anyhow::Result;
use wgpu::util::DeviceExt;

use crate::assets::texture::TextureCpu;
use crate::assets::VatAsset;
use crate::gfx::inject::{compose_vat_shader, BASE_TEMPLATE};
use crate::gfx::pipeline::{create_shader_from_source, create_vat_bgl, create_vat_pipeline};
use crate::gfx::types::VatUniform;
use crate::vat::params::VatParams;
use crate::vat::timebase::{select_frame, FrameCursor, PlaybackState};

pub struct VatMaterial {
    pub params: VatParams,
    pub playback: PlaybackState,
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    uniform_buf: wgpu::Buffer,
    has_normal: bool,
    /// Warn-once latch for the fail-closed path.
    degraded: bool,
    _position_view: wgpu::TextureView,
    _normal_view: Option<wgpu::TextureView>,
    _sampler: wgpu::Sampler,
}

impl VatMaterial {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        globals_bgl: &wgpu::BindGroupLayout,
        model_bgl: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        asset: &VatAsset,
    ) -> Result<Self> {
        let params = asset.params;
        let has_normal = asset.normal_tex.is_some();

        // Per-instance shader composition; the shared template is read-only.
        let source = compose_vat_shader(BASE_TEMPLATE, has_normal)?;
        let shader = create_shader_from_source(device, "vat-shader", source);

        let position_view =
            upload_vat_texture(device, queue, "vat-position", &asset.position_tex);
        let normal_view = asset
            .normal_tex
            .as_ref()
            .map(|tex| upload_vat_texture(device, queue, "vat-normal", tex));
        if !has_normal {
            log::info!("VAT material: no normal texture; base normal path in effect");
        }

        // Nearest + clamp: frame addressing must hit exact texels, and the
        // last frame row sits against the texture edge.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("vat-sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        let playback = PlaybackState::default();
        let cursor = select_frame(&playback, params.frame_count)?;
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vat-uniform"),
            contents: bytemuck::bytes_of(&snapshot(&params, &cursor)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vat_bgl = create_vat_bgl(device, has_normal);
        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&position_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ];
        if let Some(view) = &normal_view {
            entries.push(wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(view),
            });
        }
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vat-bg"),
            layout: &vat_bgl,
            entries: &entries,
        });

        let pipeline = create_vat_pipeline(
            device,
            &shader,
            globals_bgl,
            model_bgl,
            &vat_bgl,
            color_format,
        );

        Ok(Self {
            params,
            playback,
            pipeline,
            bind_group,
            uniform_buf,
            has_normal,
            degraded: false,
            _position_view: position_view,
            _normal_view: normal_view,
            _sampler: sampler,
        })
    }

    pub fn has_normal(&self) -> bool {
        self.has_normal
    }

    /// Per-displayed-frame update: run the frame selector and overwrite the
    /// uniform snapshot. Never blocks, never fails the frame — a selector
    /// error (bad speed pushed by the host) holds the last good snapshot.
    pub fn update(&mut self, queue: &wgpu::Queue) {
        match select_frame(&self.playback, self.params.frame_count) {
            Ok(cursor) => {
                queue.write_buffer(
                    &self.uniform_buf,
                    0,
                    bytemuck::bytes_of(&snapshot(&self.params, &cursor)),
                );
                if self.degraded {
                    log::info!("VAT playback recovered");
                    self.degraded = false;
                }
            }
            Err(e) => {
                if !self.degraded {
                    log::warn!("VAT frame selection failed; holding last pose: {e:#}");
                    self.degraded = true;
                }
            }
        }
    }

    pub fn toggle_animated(&mut self) {
        self.playback.animated = !self.playback.animated;
        log::info!(
            "VAT playback: {}",
            if self.playback.animated {
                "animated"
            } else {
                "manual"
            }
        );
    }

    /// Step the manual frame and drop into manual mode (blend stays 0 so a
    /// paused pose never shows interpolation artifacts).
    pub fn step_manual(&mut self, delta: i32) {
        self.playback.animated = false;
        let last = self.params.frame_count - 1;
        let stepped = self.playback.manual_frame as i64 + delta as i64;
        self.playback.manual_frame = stepped.clamp(0, last as i64) as u32;
    }

    /// Multiplicative speed adjustment; the factor keeps speed strictly
    /// positive so animated mode never sees a rejected value.
    pub fn adjust_speed(&mut self, factor: f32) {
        if factor > 0.0 {
            self.playback.speed = (self.playback.speed * factor).clamp(0.1, 480.0);
        }
    }
}

fn snapshot(params: &VatParams, cursor: &FrameCursor) -> VatUniform {
    VatUniform {
        min_values: params.min_values.to_array(),
        frame_a: cursor.current as f32,
        max_values: params.max_values.to_array(),
        frame_b: cursor.next as f32,
        row_step: params.row_step(),
        blend: cursor.blend,
        _pad: [0.0; 2],
    }
}

/// Upload a VAT data texture. Linear (non-sRGB) format: texels are packed
/// samples, not color.
fn upload_vat_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    tex: &TextureCpu,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: tex.width,
        height: tex.height,
        depth_or_array_layers: 1,
    };
    let tex_obj = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &tex_obj,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &tex.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * tex.width),
            rows_per_image: Some(tex.height),
        },
        size,
    );
    tex_obj.create_view(&wgpu::TextureViewDescriptor::default())
}
