// VIEW: Rendering and graphics
pub mod gpu_init;
pub mod model_loader;
pub mod render;
pub mod resources;

pub use gpu_init::{GpuContext, GpuInitError};
pub use model_loader::load_gltf_mesh;
pub use render::{build_draw_list, DrawCommand, DrawMaterial, FrameRenderer, FrameUniform, SceneTextures};
pub use resources::{AssetError, MeshKind, ResourceCache, TextureHandle};
