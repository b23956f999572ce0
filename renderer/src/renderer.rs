use anyhow::Result;
use log::{info, warn};
use wgpu::{PresentMode, StoreOp};

use crate::{RenderDevice, config::RendererConfig, tools::PipelineTargets};

const DESIRED_MAXIMUM_FRAME_LATENCY: u32 = 2;

/// The context provided to [`FrameLayer::prepare`].
pub struct PreparationContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
}

/// Per frame facts every layer may depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub surface_size: (u32, u32),
}

/// Something that contributes draws to the frame's render pass.
///
/// All layers are prepared before the pass begins, then rendered in order.
pub trait FrameLayer {
    /// Upload whatever the next [`FrameLayer::render`] needs.
    fn prepare(&mut self, context: &PreparationContext, frame: &FrameGeometry) -> Result<()>;

    fn render(&self, pass: &mut wgpu::RenderPass<'_>);
}

#[derive(Debug)]
pub struct Renderer {
    pub device: RenderDevice,
    surface: wgpu::Surface<'static>,
    config: RendererConfig,
    pub surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
}

impl Renderer {
    /// Creates a new renderer and configures the surface.
    pub fn new(
        device: RenderDevice,
        surface: wgpu::Surface<'static>,
        initial_size: (u32, u32),
        config: RendererConfig,
    ) -> Self {
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: device.surface_format,
            width: initial_size.0.max(1),
            height: initial_size.1.max(1),
            present_mode: PresentMode::AutoVsync,
            alpha_mode: device.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: DESIRED_MAXIMUM_FRAME_LATENCY,
        };

        let depth_view = create_depth_view(&device.device, &surface_config, config.depth_format);

        let mut renderer = Self {
            device,
            surface,
            config,
            surface_config,
            depth_view,
        };

        renderer.reconfigure_surface();
        renderer
    }

    /// Formats pipelines need to render into this renderer's frames.
    pub fn targets(&self) -> PipelineTargets {
        PipelineTargets {
            color_format: self.surface_config.format,
            depth_format: self.config.depth_format,
        }
    }

    pub fn frame_geometry(&self) -> FrameGeometry {
        FrameGeometry {
            surface_size: self.surface_size(),
        }
    }

    /// Prepares all layers, renders them in one pass, and presents.
    ///
    /// Layers are prepared even if the frame is then skipped because the surface texture can not be
    /// acquired, so per frame state queued in a layer never outlives its frame.
    #[tracing::instrument(skip_all)]
    pub fn render_and_present(&mut self, layers: &mut [&mut dyn FrameLayer]) -> Result<()> {
        let frame = self.frame_geometry();
        {
            let context = PreparationContext {
                device: &self.device.device,
                queue: &self.device.queue,
            };
            for layer in layers.iter_mut() {
                layer.prepare(&context, &frame)?;
            }
        }

        let Some(surface_texture) = self.get_current_texture() else {
            return Ok(());
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.device
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });

        {
            let load_op = match self.config.background_color {
                Some(color) => {
                    let (r, g, b, a) = color.into();
                    wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as _,
                        g: g as _,
                        b: b as _,
                        a: a as _,
                    })
                }
                None => wgpu::LoadOp::Load,
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: load_op,
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for layer in layers.iter() {
                layer.render(&mut pass);
            }
        }

        self.device.queue.submit([encoder.finish()]);
        surface_texture.present();
        Ok(())
    }

    fn get_current_texture(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(texture) => Some(texture),
            Err(e) => {
                // Try to reconfigure and re-acquire once.
                warn!("Surface error: {e:?}, retrying...");
                self.reconfigure_surface();
                match self.surface.get_current_texture() {
                    Ok(texture) => Some(texture),
                    Err(e) => {
                        warn!("Surface error: {e:?}, skipping frame");
                        None
                    }
                }
            }
        }
    }

    /// Resizes the surface, if necessary.
    ///
    /// Keeps the minimum surface size at at least 1x1.
    pub fn resize_surface(&mut self, new_size: (u32, u32)) {
        let new_surface_size = (new_size.0.max(1), new_size.1.max(1));

        if new_surface_size == self.surface_size() {
            return;
        }
        let config = &mut self.surface_config;
        config.width = new_surface_size.0;
        config.height = new_surface_size.1;

        self.reconfigure_surface();
    }

    /// Returns the current surface size.
    ///
    /// It may not exactly match the window's size, for example if the window's size is 0,0, the
    /// surface's size will be 1x1.
    pub fn surface_size(&self) -> (u32, u32) {
        let config = &self.surface_config;
        (config.width, config.height)
    }

    pub fn reconfigure_surface(&mut self) {
        info!(
            "Reconfiguring surface {}x{}",
            self.surface_config.width, self.surface_config.height
        );
        self.surface
            .configure(&self.device.device, &self.surface_config);
        self.depth_view = create_depth_view(
            &self.device.device,
            &self.surface_config,
            self.config.depth_format,
        );
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    surface_config: &wgpu::SurfaceConfiguration,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: surface_config.width,
            height: surface_config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
