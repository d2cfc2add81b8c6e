//! wgpu/winit backend for the displacement slider.

pub mod backend;
pub mod camera;
mod compile;
mod context;
mod material;
pub mod scene;
mod textures;
pub mod window;

pub use backend::WgpuBackend;
pub use camera::{quad_vertices, OrthoCamera, QuadVertex};
pub use scene::GpuScene;
pub use window::run;
