//! Demo viewer: plays back one baked VAT asset with keyboard control.
//!
//! Usage: `vat_viewer [asset-dir]` where the directory holds `model.gltf`,
//! `position.png`, and optionally `normal.png` / `meta.json` (defaults to
//! `assets/vat`).
//!
//! Keys: Space toggles animated/manual, Left/Right step the manual frame,
//! Up/Down adjust speed, Escape quits.

use anyhow::{Context, Result};
use std::path::PathBuf;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowAttributes,
};

use vatplay::gfx::Renderer;

fn main() -> Result<()> {
    // Developer-friendly default logging (info+) unless RUST_LOG overrides.
    // Suppress noisy GPU backend logs by default.
    let default = "info,wgpu_hal=off,wgpu_core=off,wgpu=off,naga=off";
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();
    pollster::block_on(run())
}

// NOTE: Uses deprecated EventLoop APIs for simplicity in this viewer.
// When we bump winit here, migrate to `EventLoop::run_app` and
// `ActiveEventLoop::create_window`.
#[allow(deprecated)]
async fn run() -> Result<()> {
    let asset_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "assets/vat".to_string()),
    );

    let event_loop = EventLoop::new().context("create event loop")?;
    let window = event_loop
        .create_window(
            WindowAttributes::default()
                .with_title("VAT Viewer")
                .with_inner_size(PhysicalSize::new(1280, 720)),
        )
        .context("create window")?;

    let mut renderer = Renderer::new(&window, &asset_dir).await?;

    Ok(event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::Resized(new_size),
            ..
        } => renderer.resize(new_size),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => match code {
            KeyCode::Space => renderer.material.toggle_animated(),
            KeyCode::ArrowLeft => renderer.material.step_manual(-1),
            KeyCode::ArrowRight => renderer.material.step_manual(1),
            KeyCode::ArrowUp => renderer.material.adjust_speed(1.25),
            KeyCode::ArrowDown => renderer.material.adjust_speed(0.8),
            KeyCode::Escape => elwt.exit(),
            _ => {}
        },
        Event::AboutToWait => match renderer.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(window.inner_size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory; exiting");
                elwt.exit();
            }
            Err(e) => log::warn!("frame skipped: {e:?}"),
        },
        _ => {}
    })?)
}
