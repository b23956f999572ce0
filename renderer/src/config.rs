//! The renderer's configuration

use meshtext_geometry::Color;

#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Clear color. `None` keeps the previous contents.
    pub background_color: Option<Color>,
    pub depth_format: wgpu::TextureFormat,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            background_color: Some(Color::rgb(0.1, 0.1, 0.1)),
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}
