//! Game tunables, grouped by the subsystem that reads them.
//!
//! Nothing here is read from disk or the command line; every value comes from
//! the `Default` impls below.

use glam::Vec3;

#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub world: WorldConfig,
    pub camera: CameraConfig,
    pub pickups: PickupConfig,
    pub lighting: LightingConfig,
    pub timestep: TimestepConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "TempleRun-Min".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub start_position: Vec3,
    pub run_speed: f32,
    pub visual_scale: f32,
    pub radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 30.0, 0.0),
            run_speed: 10.0,
            visual_scale: 0.15,
            radius: 0.6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub gravity: f32,
    pub ground_level: f32,
    pub plane_half_extent: f32,
    pub ground_tiling: f32,
    pub clear_color: [f64; 3],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            ground_level: 0.0,
            plane_half_extent: 50.0,
            ground_tiling: 30.0,
            clear_color: [0.10, 0.12, 0.16],
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub trail_distance: f32,
    pub height_offset: f32,
    pub look_ahead: f32,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            trail_distance: 8.0,
            height_offset: 6.0,
            look_ahead: 5.0,
            fov_y_deg: 60.0,
            z_near: 0.1,
            z_far: 2000.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PickupConfig {
    pub seed: u64,
    pub count: usize,
    /// Pickups are placed in `[-range, range)` on both horizontal axes.
    pub range: f32,
    pub base_height: f32,
    /// Added to `base_height` once per pickup index.
    pub height_step: f32,
    pub radius: f32,
    pub tint_min: f32,
    pub tint_max: f32,
    pub sphere_stacks: u32,
    pub sphere_slices: u32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            count: 5,
            range: 40.0,
            base_height: 2.0,
            height_step: 0.2,
            radius: 2.0,
            tint_min: 0.3,
            tint_max: 1.0,
            sphere_stacks: 16,
            sphere_slices: 24,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LightingConfig {
    pub direction: Vec3,
    pub color: Vec3,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.3, -1.0, -0.2).normalize(),
            color: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimestepConfig {
    /// Longest single integration step, in seconds.
    pub max_substep: f32,
    /// Frame deltas above this are truncated (stalls, debugger pauses).
    pub max_frame_delta: f32,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            max_substep: 1.0 / 120.0,
            max_frame_delta: 0.25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub ground_texture: String,
    pub player_texture: String,
    pub player_model: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            ground_texture: "assets/textures/marble.jpg".to_string(),
            player_texture: "assets/models/player.png".to_string(),
            player_model: "assets/models/player.gltf".to_string(),
        }
    }
}
