use anyhow::Result;

use meshtext_geometry::{Color, Matrix4, pixel_projection_y_down};

use crate::{
    ShaderLibrary,
    pods::{AsBytes, MatrixColor, Vertex},
    renderer::{FrameGeometry, FrameLayer, PreparationContext},
    tools::{DepthMode, DynamicBuffer, PipelineTargets, create_pipeline, matrix_color_pipeline_layout},
};

/// An axis aligned rectangle in pixels, origin top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Two triangles.
    pub fn vertices(&self) -> [Vertex; 6] {
        let (l, t) = (self.left, self.top);
        let (r, b) = (self.left + self.width, self.top + self.height);
        [
            Vertex::new(l, t, 0.0),
            Vertex::new(r, t, 0.0),
            Vertex::new(r, b, 0.0),
            Vertex::new(l, t, 0.0),
            Vertex::new(r, b, 0.0),
            Vertex::new(l, b, 0.0),
        ]
    }
}

/// A translucent 2D square blended over everything rendered before it.
#[derive(Debug)]
pub struct OverlayRenderer {
    pipeline: wgpu::RenderPipeline,
    /// Re-uploaded every frame.
    vertex_buffer: DynamicBuffer,
    pub rect: PixelRect,
    pub color: Color,
    projection: Matrix4,
}

impl OverlayRenderer {
    pub const DEFAULT_RECT: PixelRect = PixelRect::new(100.0, 100.0, 200.0, 200.0);

    pub fn new(
        device: &wgpu::Device,
        targets: PipelineTargets,
        shaders: &ShaderLibrary,
    ) -> Result<Self> {
        let shader = shaders.compile(device, "overlay")?;
        let pipeline_layout = matrix_color_pipeline_layout(device, "Overlay Pipeline Layout");

        let pipeline = create_pipeline(
            "Overlay Pipeline",
            device,
            &shader,
            &[Vertex::layout()],
            &pipeline_layout,
            targets,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            DepthMode::Ignore,
        )?;

        Ok(Self {
            pipeline,
            vertex_buffer: DynamicBuffer::new::<Vertex>(device, "Overlay Vertex Buffer", 6),
            rect: Self::DEFAULT_RECT,
            color: Color::new(0.5, 0.5, 0.5, 0.5),
            projection: Matrix4::IDENTITY,
        })
    }
}

impl FrameLayer for OverlayRenderer {
    fn prepare(&mut self, context: &PreparationContext, frame: &FrameGeometry) -> Result<()> {
        self.projection = pixel_projection_y_down(frame.surface_size);
        self.vertex_buffer
            .upload(context.device, context.queue, &self.rect.vertices());
        Ok(())
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_buffer.is_empty() {
            return;
        }
        let constants = MatrixColor::new(&self.projection, self.color);
        pass.set_pipeline(&self.pipeline);
        pass.set_push_constants(wgpu::ShaderStages::VERTEX, 0, constants.as_bytes());
        pass.set_vertex_buffer(0, self.vertex_buffer.slice());
        pass.draw(0..self.vertex_buffer.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_vertices_cover_the_corners() {
        let v = PixelRect::new(10.0, 20.0, 30.0, 40.0).vertices();
        assert_eq!(v[0].position, [10.0, 20.0, 0.0]);
        assert_eq!(v[2].position, [40.0, 60.0, 0.0]);
        assert_eq!(v[5].position, [10.0, 60.0, 0.0]);
    }
}
