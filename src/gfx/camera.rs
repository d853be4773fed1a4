//! Camera utilities.
//!
//! The viewer only needs a slow orbit around the playback subject; a real
//! client would drive this from input and scene state.

use glam::{Mat4, Vec3};

pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Orbit `target` at `radius`, keeping the eye a little above the
    /// subject so the ground plane stays visible.
    pub fn orbit(target: Vec3, radius: f32, angle: f32, aspect: f32) -> Self {
        let eye = target + Vec3::new(angle.cos() * radius, radius * 0.45, angle.sin() * radius);
        Self {
            eye,
            target,
            aspect,
            fovy: 55f32.to_radians(),
            znear: 0.1,
            zfar: 200.0,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}
