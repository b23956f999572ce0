use anyhow::Result;
use wgpu::util::{BufferInitDescriptor, DeviceExt};

use meshtext_geometry::{Color, Matrix4, Projection, Vector3};

use crate::{
    ShaderLibrary,
    pods::{AsBytes, MatrixColor, Vertex},
    renderer::{FrameGeometry, FrameLayer, PreparationContext},
    tools::{DepthMode, PipelineTargets, create_pipeline, matrix_color_pipeline_layout},
};

const FOVY: f32 = 45.0;
const Z_RANGE: (f32, f32) = (0.1, 100.0);
const CAMERA_DISTANCE: f32 = 3.0;

/// A unit cube centered at the origin, two triangles per face.
#[rustfmt::skip]
pub const CUBE_VERTICES: [Vertex; 36] = {
    const fn v(x: f32, y: f32, z: f32) -> Vertex { Vertex::new(x, y, z) }
    [
        v(-0.5, -0.5, -0.5), v( 0.5, -0.5, -0.5), v( 0.5,  0.5, -0.5),
        v( 0.5,  0.5, -0.5), v(-0.5,  0.5, -0.5), v(-0.5, -0.5, -0.5),

        v(-0.5, -0.5,  0.5), v( 0.5, -0.5,  0.5), v( 0.5,  0.5,  0.5),
        v( 0.5,  0.5,  0.5), v(-0.5,  0.5,  0.5), v(-0.5, -0.5,  0.5),

        v(-0.5,  0.5,  0.5), v(-0.5,  0.5, -0.5), v(-0.5, -0.5, -0.5),
        v(-0.5, -0.5, -0.5), v(-0.5, -0.5,  0.5), v(-0.5,  0.5,  0.5),

        v( 0.5,  0.5,  0.5), v( 0.5,  0.5, -0.5), v( 0.5, -0.5, -0.5),
        v( 0.5, -0.5, -0.5), v( 0.5, -0.5,  0.5), v( 0.5,  0.5,  0.5),

        v(-0.5, -0.5, -0.5), v( 0.5, -0.5, -0.5), v( 0.5, -0.5,  0.5),
        v( 0.5, -0.5,  0.5), v(-0.5, -0.5,  0.5), v(-0.5, -0.5, -0.5),

        v(-0.5,  0.5, -0.5), v( 0.5,  0.5, -0.5), v( 0.5,  0.5,  0.5),
        v( 0.5,  0.5,  0.5), v(-0.5,  0.5,  0.5), v(-0.5,  0.5, -0.5),
    ]
};

/// A cube rotating around a fixed axis, seen through a perspective camera.
#[derive(Debug)]
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    pub color: Color,
    /// Rotation in radians around [`CubeRenderer::AXIS`].
    pub angle: f32,
    model_view_projection: Matrix4,
}

impl CubeRenderer {
    pub const AXIS: Vector3 = Vector3::new(0.5, 1.0, 0.0);

    pub fn new(
        device: &wgpu::Device,
        targets: PipelineTargets,
        shaders: &ShaderLibrary,
    ) -> Result<Self> {
        let shader = shaders.compile(device, "cube")?;
        let pipeline_layout = matrix_color_pipeline_layout(device, "Cube Pipeline Layout");

        let pipeline = create_pipeline(
            "Cube Pipeline",
            device,
            &shader,
            &[Vertex::layout()],
            &pipeline_layout,
            targets,
            None,
            DepthMode::Test,
        )?;

        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            color: Color::new(0.2, 0.6, 1.0, 1.0),
            angle: 0.0,
            model_view_projection: Matrix4::IDENTITY,
        })
    }

    pub fn model_view_projection(angle: f32, surface_size: (u32, u32)) -> Matrix4 {
        let model = Matrix4::from_axis_angle(Self::AXIS.normalize(), angle);
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -CAMERA_DISTANCE));
        let projection =
            Projection::for_surface(surface_size, Z_RANGE.0, Z_RANGE.1).perspective_matrix(FOVY);
        projection * view * model
    }
}

impl FrameLayer for CubeRenderer {
    fn prepare(&mut self, _context: &PreparationContext, frame: &FrameGeometry) -> Result<()> {
        self.model_view_projection = Self::model_view_projection(self.angle, frame.surface_size);
        Ok(())
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        let constants = MatrixColor::new(&self.model_view_projection, self.color);
        pass.set_pipeline(&self.pipeline);
        pass.set_push_constants(wgpu::ShaderStages::VERTEX, 0, constants.as_bytes());
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..CUBE_VERTICES.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_inside_the_view_volume() {
        for angle in [0.0, 0.7, 2.0] {
            let m = CubeRenderer::model_view_projection(angle, (800, 600));
            for v in CUBE_VERTICES {
                let p = m.project_point3(Vector3::from(v.position));
                assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "{p:?}");
                assert!((0.0..=1.0).contains(&p.z), "{p:?}");
            }
        }
    }
}
