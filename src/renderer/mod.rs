pub mod camera;
pub mod render;
pub mod renderer;
pub mod vertex;

pub use renderer::Renderer;
