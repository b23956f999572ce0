use futures::executor::block_on;

use crate::{ShaderError, pods::MatrixColor};

const VERTEX_SHADER_ENTRY: &str = "vs_main";
const FRAGMENT_SHADER_ENTRY: &str = "fs_main";

/// How a pipeline interacts with the frame's depth buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Depth test and write, for 3D content.
    Test,
    /// Always pass, never write. 2D content drawn over everything rendered before.
    Ignore,
}

impl DepthMode {
    fn state(self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self {
            DepthMode::Test => (true, wgpu::CompareFunction::Less),
            DepthMode::Ignore => (false, wgpu::CompareFunction::Always),
        };
        wgpu::DepthStencilState {
            format,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Target formats and blending of the pipelines rendering into the frame.
#[derive(Debug, Clone, Copy)]
pub struct PipelineTargets {
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

/// A pipeline layout with one vertex stage [`MatrixColor`] push constant range.
pub fn matrix_color_pipeline_layout(device: &wgpu::Device, label: &str) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[],
        push_constant_ranges: &[wgpu::PushConstantRange {
            stages: wgpu::ShaderStages::VERTEX,
            range: 0..MatrixColor::SIZE,
        }],
    })
}

/// Creates a pipeline, reporting validation failures as [`ShaderError::Link`].
#[allow(clippy::too_many_arguments)]
pub fn create_pipeline(
    label: &str,
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    vert_layout: &[wgpu::VertexBufferLayout],
    pipeline_layout: &wgpu::PipelineLayout,
    targets: PipelineTargets,
    blend: Option<wgpu::BlendState>,
    depth: DepthMode,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    let color_targets = [Some(wgpu::ColorTargetState {
        format: targets.color_format,
        blend,
        write_mask: wgpu::ColorWrites::ALL,
    })];

    let pipeline = wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(VERTEX_SHADER_ENTRY),
            compilation_options: Default::default(),
            buffers: vert_layout,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(FRAGMENT_SHADER_ENTRY),
            compilation_options: Default::default(),
            targets: &color_targets,
        }),
        primitive: wgpu::PrimitiveState {
            // Glyph meshes and the cube don't guarantee a winding order.
            cull_mode: None,
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: Some(depth.state(targets.depth_format)),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(&pipeline);
    if let Some(error) = block_on(device.pop_error_scope()) {
        return Err(ShaderError::Link {
            label: label.into(),
            message: error.to_string(),
        });
    }

    Ok(pipeline)
}
