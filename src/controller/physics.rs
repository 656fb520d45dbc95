use glam::Vec3;

use crate::config::{TimestepConfig, WorldConfig};

/// Handles player physics (gravity, ground collision)
pub struct PhysicsSystem {
    pub gravity: f32,
    pub ground_level: f32,
    pub max_substep: f32,
    pub max_frame_delta: f32,
}

impl PhysicsSystem {
    pub fn new(world: &WorldConfig, timestep: &TimestepConfig) -> Self {
        Self {
            gravity: world.gravity,
            ground_level: world.ground_level,
            max_substep: timestep.max_substep,
            max_frame_delta: timestep.max_frame_delta,
        }
    }

    /// Frame delta actually simulated. Negative and NaN deltas count as zero.
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            return 0.0;
        }
        dt.clamp(0.0, self.max_frame_delta)
    }

    /// Integrate vertical motion over `dt`, in substeps no longer than
    /// `max_substep`. The ground clamp runs after every position update.
    pub fn integrate_vertical(&self, pos: &mut Vec3, vel: &mut Vec3, radius: f32, dt: f32) {
        let dt = self.clamp_delta(dt);
        if dt <= 0.0 {
            return;
        }
        let steps = (dt / self.max_substep).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            vel.y += self.gravity * h;
            pos.y += vel.y * h;
            self.clamp_to_ground(pos, vel, radius);
        }
    }

    /// Penetration correction: snap onto the ground and drop any downward
    /// velocity. No bounce.
    pub fn clamp_to_ground(&self, pos: &mut Vec3, vel: &mut Vec3, radius: f32) -> bool {
        let min_y = self.ground_level + radius;
        if pos.y < min_y {
            pos.y = min_y;
            if vel.y < 0.0 {
                vel.y = 0.0;
            }
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> PhysicsSystem {
        PhysicsSystem::new(&WorldConfig::default(), &TimestepConfig::default())
    }

    #[test]
    fn free_fall_gains_speed() {
        let p = physics();
        let mut pos = Vec3::new(0.0, 30.0, 0.0);
        let mut vel = Vec3::ZERO;
        p.integrate_vertical(&mut pos, &mut vel, 0.6, 0.1);
        assert!((vel.y - -2.0).abs() < 1e-4);
        assert!(pos.y < 30.0 && pos.y > 29.8);
    }

    #[test]
    fn clamp_zeroes_only_downward_velocity() {
        let p = physics();
        let mut pos = Vec3::new(0.0, -1.0, 0.0);
        let mut vel = Vec3::new(0.0, -5.0, 0.0);
        assert!(p.clamp_to_ground(&mut pos, &mut vel, 0.6));
        assert_eq!(pos.y, 0.6);
        assert_eq!(vel.y, 0.0);

        let mut pos = Vec3::new(0.0, 0.0, 0.0);
        let mut vel = Vec3::new(0.0, 3.0, 0.0);
        assert!(p.clamp_to_ground(&mut pos, &mut vel, 0.6));
        assert_eq!(vel.y, 3.0);

        let mut pos = Vec3::new(0.0, 5.0, 0.0);
        let mut vel = Vec3::new(0.0, -3.0, 0.0);
        assert!(!p.clamp_to_ground(&mut pos, &mut vel, 0.6));
    }

    #[test]
    fn huge_delta_does_not_tunnel() {
        let p = physics();
        let mut pos = Vec3::new(0.0, 1.0, 0.0);
        let mut vel = Vec3::new(0.0, -500.0, 0.0);
        p.integrate_vertical(&mut pos, &mut vel, 0.6, 10.0);
        assert_eq!(pos.y, 0.6);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let p = physics();
        let mut pos = Vec3::new(0.0, 10.0, 0.0);
        let mut vel = Vec3::ZERO;
        p.integrate_vertical(&mut pos, &mut vel, 0.6, -1.0);
        p.integrate_vertical(&mut pos, &mut vel, 0.6, f32::NAN);
        assert_eq!(pos.y, 10.0);
        assert_eq!(vel, Vec3::ZERO);
        assert_eq!(p.clamp_delta(5.0), 0.25);
    }
}
