//! Instanced rendering of mesh text.

use anyhow::Result;
use derive_more::Debug;
use wgpu::util::{BufferInitDescriptor, DeviceExt};

use meshtext_geometry::{Color, Matrix4, Vector2, pixel_projection_y_up};

use crate::{
    ShaderLibrary,
    draw_plan::{DrawPlan, TextRun, TextRuns},
    glyph_atlas::GlyphAtlas,
    instance_batcher::Alignment,
    pods::{AsBytes, GlyphVertex, InstanceTransform, MatrixColor},
    renderer::{FrameGeometry, FrameLayer, PreparationContext},
    tools::{DepthMode, DynamicBuffer, PipelineTargets, create_pipeline, matrix_color_pipeline_layout},
};

const INITIAL_INSTANCE_CAPACITY: usize = 64;

/// Draws strings with the glyph meshes of a [`GlyphAtlas`].
///
/// Text is positioned in pixels, origin at the bottom left of the surface. Runs recorded with
/// [`TextRenderer::draw_text`] are drawn in the next frame and then discarded.
#[derive(Debug)]
pub struct TextRenderer {
    #[debug(skip)]
    atlas: GlyphAtlas,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    /// Rewritten in full on every prepare.
    instance_buffer: DynamicBuffer,

    pending_runs: TextRuns,
    /// Runs and plan of the frame being rendered.
    runs: Vec<TextRun>,
    plan: DrawPlan,
    view_projection: Matrix4,
}

impl TextRenderer {
    pub fn new(
        device: &wgpu::Device,
        targets: PipelineTargets,
        shaders: &ShaderLibrary,
        atlas: GlyphAtlas,
    ) -> Result<Self> {
        let shader = shaders.compile(device, "text")?;
        let pipeline_layout = matrix_color_pipeline_layout(device, "Text Pipeline Layout");

        let pipeline = create_pipeline(
            "Text Pipeline",
            device,
            &shader,
            &[GlyphVertex::layout(), InstanceTransform::layout()],
            &pipeline_layout,
            targets,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            DepthMode::Ignore,
        )?;

        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Glyph Atlas Vertex Buffer"),
            contents: bytemuck::cast_slice(atlas.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: Some("Glyph Atlas Index Buffer"),
            contents: bytemuck::cast_slice(atlas.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_buffer = DynamicBuffer::new::<InstanceTransform>(
            device,
            "Text Instance Buffer",
            INITIAL_INSTANCE_CAPACITY,
        );

        Ok(Self {
            atlas,
            pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            pending_runs: TextRuns::default(),
            runs: Vec::new(),
            plan: DrawPlan::default(),
            view_projection: Matrix4::IDENTITY,
        })
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Records a string for the next frame. Empty strings are ignored.
    ///
    /// The queue is drained whenever this renderer is prepared, which happens on every frame it is
    /// a layer of, presented or not.
    pub fn draw_text(
        &mut self,
        text: &str,
        position: impl Into<Vector2>,
        scale: f32,
        color: Color,
        alignment: Alignment,
    ) {
        self.pending_runs
            .push(TextRun::new(text, position, scale, color, alignment));
    }
}

impl FrameLayer for TextRenderer {
    #[tracing::instrument(skip_all)]
    fn prepare(&mut self, context: &PreparationContext, frame: &FrameGeometry) -> Result<()> {
        self.runs = self.pending_runs.take();
        self.plan = DrawPlan::build(&self.atlas, &self.runs);
        self.view_projection = pixel_projection_y_up(frame.surface_size);

        let transforms: Vec<InstanceTransform> = self
            .plan
            .instances()
            .iter()
            .map(|record| InstanceTransform::from(&record.matrix))
            .collect();

        self.instance_buffer
            .upload(context.device, context.queue, &transforms);
        Ok(())
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.plan.is_empty() {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice());
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut current_run = None;
        for draw in self.plan.draws() {
            if current_run != Some(draw.run) {
                let constants = MatrixColor::new(&self.view_projection, self.runs[draw.run].color);
                pass.set_push_constants(wgpu::ShaderStages::VERTEX, 0, constants.as_bytes());
                current_run = Some(draw.run);
            }
            // Atlas indices are absolute.
            pass.draw_indexed(draw.indices.clone(), 0, draw.instances.clone());
        }
    }
}
