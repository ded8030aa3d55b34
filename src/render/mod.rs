pub mod motion;
pub mod renderer;
pub mod shapes;

pub use renderer::Renderer;
