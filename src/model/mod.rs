// MODEL: Game state and data
pub mod camera;
pub mod geometry;
pub mod pickup;
pub mod player;

pub use camera::{CameraFrame, CameraRig};
pub use geometry::{build_plane, build_sphere, GeometryError};
pub use pickup::{Pickup, PickupSet};
pub use player::Player;
