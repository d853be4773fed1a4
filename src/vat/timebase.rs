//! Frame selection: host-side time base for looped or manual playback.
//!
//! Runs once per displayed frame on the host; the resulting `FrameCursor` is
//! pushed to the GPU as part of the uniform snapshot. The clock itself is
//! never wrapped — wrapping applies only when computing the frame index, so
//! looping stays seamless for arbitrarily long sessions.

use anyhow::{bail, Result};

/// Mutable per-instance playback controls, owned by the host layer and read
/// once per displayed frame.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackState {
    /// When false, `manual_frame` selects the pose and interpolation is off.
    pub animated: bool,
    /// Seconds accumulated since playback start. Monotonic; never wrapped.
    pub elapsed_time: f32,
    /// Playback speed in baked frames per second. Must be > 0 in animated mode.
    pub speed: f32,
    /// Frame shown in manual mode; clamped to the valid range at evaluation.
    pub manual_frame: u32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            animated: true,
            elapsed_time: 0.0,
            speed: 24.0,
            manual_frame: 0,
        }
    }
}

impl PlaybackState {
    /// Advance the clock. Negative deltas are ignored so the clock stays
    /// monotonic even if a host passes a bad timestamp difference.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed_time += dt.max(0.0);
    }
}

/// The active frame pair and blend factor for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCursor {
    pub current: u32,
    pub next: u32,
    /// Fractional position between `current` and `next`, in `[0, 1)`.
    pub blend: f32,
}

/// Derive `(current, next, blend)` from the playback state.
///
/// Animated mode maps `elapsed_time * speed` into `[0, frame_count)` with a
/// float modulo; the last frame blends toward frame 0 so the loop boundary has
/// no discontinuity. Manual mode clamps and disables interpolation.
pub fn select_frame(state: &PlaybackState, frame_count: u32) -> Result<FrameCursor> {
    if frame_count == 0 {
        bail!("frame selection requires frame_count >= 1");
    }
    if !state.animated {
        let current = state.manual_frame.min(frame_count - 1);
        return Ok(FrameCursor {
            current,
            next: current,
            blend: 0.0,
        });
    }
    if state.speed <= 0.0 {
        bail!("animated playback requires speed > 0 (got {})", state.speed);
    }
    let fc = frame_count as f32;
    let mut frame_time = (state.elapsed_time * state.speed).rem_euclid(fc);
    // rem_euclid can land exactly on fc under rounding; that is the wrap point.
    if frame_time >= fc {
        frame_time = 0.0;
    }
    let current = frame_time.floor() as u32;
    let blend = frame_time - current as f32;
    let next = (current + 1) % frame_count;
    Ok(FrameCursor {
        current,
        next,
        blend,
    })
}
