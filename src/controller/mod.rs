// CONTROLLER: Input, game logic, and update loop
pub mod frame_loop;
pub mod input;
pub mod physics;
pub mod player_controller;

pub use frame_loop::{FrameClock, Simulation};
pub use input::{Action, InputEvent, InputProcessor, InputState, KeyBindings};
pub use physics::PhysicsSystem;
pub use player_controller::PlayerController;
