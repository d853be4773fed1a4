//! vatplay: vertex-animation-texture playback on wgpu.
//!
//! Baked per-vertex animation is stored as texture rows (one row per frame)
//! and decoded in the vertex stage. The host keeps the clock and pushes one
//! uniform snapshot per displayed frame; all geometry transformation happens
//! per-vertex on the GPU — the loaded mesh is never mutated.
//!
//! Layering
//! - [`vat`]: parameter store, frame selection, CPU reference for the decode
//! - [`assets`]: mesh/texture/metadata loading (the collaborator side)
//! - [`gfx`]: wgpu renderer, shader composition, playback material

pub mod assets;
pub mod gfx;
pub mod vat;
