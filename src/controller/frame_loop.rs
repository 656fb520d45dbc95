use std::time::Instant;

use crate::config::GameConfig;
use crate::controller::input::{Action, InputEvent, InputProcessor, InputState};
use crate::controller::physics::PhysicsSystem;
use crate::controller::player_controller::PlayerController;
use crate::model::{CameraFrame, CameraRig, PickupSet, Player};

/// Monotonic frame timer with a once-per-second FPS estimate.
pub struct FrameClock {
    last_frame_time: Instant,
    pub fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self {
            last_frame_time: now,
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
            tracing::debug!(fps = self.fps, "frame stats");
        }
        dt
    }
}

/// All simulation state the frame loop drives, with no GPU attached.
///
/// Per frame the caller runs `handle_event` for each polled event, then
/// `advance`, draws, and finally `collect_pickups`.
pub struct Simulation {
    pub controller: PlayerController,
    pub pickups: PickupSet,
    pub camera_rig: CameraRig,
    input_state: InputState,
    input_processor: InputProcessor,
    exit_requested: bool,
}

impl Simulation {
    pub fn new(config: &GameConfig) -> Self {
        let player = Player::new(&config.player);
        let physics = PhysicsSystem::new(&config.world, &config.timestep);
        let pickups = PickupSet::generate(config.pickups.seed, config.pickups.count, &config.pickups);
        tracing::info!(count = pickups.len(), seed = config.pickups.seed, "pickups spawned");

        Self {
            controller: PlayerController::new(player, physics),
            pickups,
            camera_rig: CameraRig::new(&config.camera),
            input_state: InputState::new(),
            input_processor: InputProcessor::default(),
            exit_requested: false,
        }
    }

    pub fn player(&self) -> &Player {
        self.controller.player()
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match self.input_processor.translate(&mut self.input_state, event) {
            Some(Action::TurnLeft) => self.controller.on_turn_left(),
            Some(Action::TurnRight) => self.controller.on_turn_right(),
            Some(Action::Exit) => self.exit_requested = true,
            None => {}
        }
    }

    /// Step the player and derive this frame's camera.
    pub fn advance(&mut self, dt: f32, width: u32, height: u32) -> CameraFrame {
        self.controller.update(dt);
        let player = self.controller.player();
        self.camera_rig.derive(player.position, player.forward(), width, height)
    }

    pub fn collect_pickups(&mut self) -> usize {
        let player = self.controller.player();
        let collected = self.pickups.evaluate(player.position, player.radius);
        if collected > 0 {
            tracing::debug!(
                collected = self.pickups.collected_count(),
                total = self.pickups.len(),
                "pickup progress"
            );
        }
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pickup;
    use glam::Vec3;
    use std::time::Duration;

    #[test]
    fn clock_measures_elapsed_time() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        let dt = clock.tick(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        // time never runs backwards
        assert_eq!(clock.tick(start), 0.0);
    }

    #[test]
    fn clock_reports_fps_after_a_second() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        for i in 1..=60 {
            clock.tick(start + Duration::from_millis(i * 20));
        }
        assert!((clock.fps - 50.0).abs() < 0.5);
    }

    #[test]
    fn turn_events_steer_the_run() {
        let mut sim = Simulation::new(&GameConfig::default());
        sim.handle_event(&InputEvent::KeyDown("d".into()));
        sim.handle_event(&InputEvent::KeyDown("d".into()));
        assert_eq!(sim.player().yaw_deg, 90.0);
        sim.handle_event(&InputEvent::KeyUp("d".into()));
        sim.handle_event(&InputEvent::KeyDown("a".into()));
        assert_eq!(sim.player().yaw_deg, 0.0);
        assert!(!sim.exit_requested());
        sim.handle_event(&InputEvent::KeyDown("Escape".into()));
        assert!(sim.exit_requested());
    }

    #[test]
    fn camera_follows_the_player() {
        let mut sim = Simulation::new(&GameConfig::default());
        let frame = sim.advance(1.0 / 60.0, 1280, 720);
        let p = sim.player().position;
        assert!(frame.eye.abs_diff_eq(p + Vec3::new(0.0, 6.0, 8.0), 1e-4));
    }

    #[test]
    fn player_lands_at_collision_radius() {
        let mut sim = Simulation::new(&GameConfig::default());
        for _ in 0..600 {
            sim.advance(1.0 / 60.0, 1280, 720);
        }
        assert_eq!(sim.player().position.y, 0.6);
    }

    #[test]
    fn running_through_a_pickup_collects_it() {
        let mut sim = Simulation::new(&GameConfig::default());
        sim.pickups = PickupSet::new(vec![Pickup::new(Vec3::new(0.0, 2.0, -20.0), 2.0, Vec3::ONE)]);
        let mut total = 0;
        for _ in 0..300 {
            sim.advance(1.0 / 60.0, 1280, 720);
            total += sim.collect_pickups();
        }
        assert_eq!(total, 1);
        assert_eq!(sim.pickups.active().count(), 0);
    }
}
