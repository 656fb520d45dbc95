//! Endless-runner demo: a player runs forward on its own, turns in quarter
//! steps, falls onto a flat ground plane and collects floating pickups.
//!
//! Layout follows model / view / controller:
//! - [`model`] holds the plain data: player, pickups, procedural meshes and
//!   the trailing camera.
//! - [`controller`] advances that data per frame: input edges, physics, the
//!   player controller and the frame loop.
//! - [`view`] owns everything on the GPU.

pub mod config;
pub mod logging;
pub mod utils;

// MVC Architecture
pub mod controller;
pub mod model;
pub mod view;
