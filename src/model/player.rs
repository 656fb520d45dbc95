use glam::Vec3;

use crate::config::PlayerConfig;

/// The runner. Position and vertical velocity evolve every frame; the rest is
/// fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing angle about +Y in degrees. Never normalized.
    pub yaw_deg: f32,
    pub run_speed: f32,
    pub radius: f32,
    pub visual_scale: f32,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            position: config.start_position,
            velocity: Vec3::ZERO,
            yaw_deg: 0.0,
            run_speed: config.run_speed,
            radius: config.radius,
            visual_scale: config.visual_scale,
        }
    }

    /// Unit horizontal direction the player runs in. Yaw 0 faces -Z.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw_deg.to_radians();
        Vec3::new(yaw.sin(), 0.0, -yaw.cos())
    }
}
