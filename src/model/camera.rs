use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Camera placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub eye: Vec3,
    pub target: Vec3,
    pub view: Mat4,
    pub proj: Mat4,
}

/// Third-person camera that trails the player. Holds only tunables; every
/// frame is derived from the current pose and viewport.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub trail_distance: f32,
    pub height_offset: f32,
    pub look_ahead: f32,
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            trail_distance: config.trail_distance,
            height_offset: config.height_offset,
            look_ahead: config.look_ahead,
            fov_y: config.fov_y_deg.to_radians(),
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }

    pub fn eye(&self, player_pos: Vec3, forward: Vec3) -> Vec3 {
        player_pos - forward * self.trail_distance + Vec3::Y * self.height_offset
    }

    pub fn target(&self, player_pos: Vec3, forward: Vec3) -> Vec3 {
        player_pos + forward * self.look_ahead
    }

    /// A zero height (minimized window) is treated as one pixel.
    pub fn aspect(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }

    pub fn derive(&self, player_pos: Vec3, forward: Vec3, width: u32, height: u32) -> CameraFrame {
        let eye = self.eye(player_pos, forward);
        let target = self.target(player_pos, forward);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, Self::aspect(width, height), self.z_near, self.z_far);
        CameraFrame { eye, target, view, proj }
    }
}
