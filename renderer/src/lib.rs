//! Instanced mesh text, plus the cube and overlay layers of the demos.

pub mod config;
mod cube_renderer;
mod draw_plan;
mod error;
mod glyph_atlas;
mod glyph_source;
mod instance_batcher;
mod overlay_renderer;
pub mod pods;
mod render_device;
mod renderer;
mod shader_library;
mod text_renderer;
pub mod tools;

pub use config::RendererConfig;
pub use cube_renderer::*;
pub use draw_plan::*;
pub use error::*;
pub use glyph_atlas::*;
pub use glyph_source::*;
pub use instance_batcher::*;
pub use overlay_renderer::*;
pub use render_device::RenderDevice;
pub use renderer::*;
pub use shader_library::*;
pub use text_renderer::TextRenderer;
