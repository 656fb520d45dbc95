use glam::Vec3;

use crate::controller::physics::PhysicsSystem;
use crate::model::Player;

const QUARTER_TURN_DEG: f32 = 90.0;

/// Owns the player and advances it each frame: forced forward running,
/// quarter turns, gravity and the ground clamp.
pub struct PlayerController {
    player: Player,
    physics: PhysicsSystem,
}

impl PlayerController {
    pub fn new(player: Player, physics: PhysicsSystem) -> Self {
        Self { player, physics }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn forward(&self) -> Vec3 {
        self.player.forward()
    }

    pub fn on_turn_left(&mut self) {
        self.player.yaw_deg -= QUARTER_TURN_DEG;
    }

    pub fn on_turn_right(&mut self) {
        self.player.yaw_deg += QUARTER_TURN_DEG;
    }

    pub fn update(&mut self, dt: f32) {
        let dt = self.physics.clamp_delta(dt);
        let forward = self.player.forward();
        let player = &mut self.player;

        player.position += forward * player.run_speed * dt;
        self.physics
            .integrate_vertical(&mut player.position, &mut player.velocity, player.radius, dt);
    }

    #[cfg(test)]
    pub fn is_grounded(&self) -> bool {
        self.player.position.y <= self.physics.ground_level + self.player.radius
            && self.player.velocity.y <= 0.0
    }
}
