use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use futures::executor::block_on;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use meshtext_renderer::{FrameLayer, RenderDevice, Renderer, ShaderLibrary, tools::PipelineTargets};

use crate::{AppConfig, FrameClock, InputState};

#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlFlow {
    Exit,
    Continue,
}

/// What an application gets to create its GPU resources.
pub struct SetupContext<'a> {
    pub device: &'a wgpu::Device,
    pub targets: PipelineTargets,
    pub shaders: ShaderLibrary,
    pub config: &'a AppConfig,
}

/// Per frame state handed to [`Application::update`].
pub struct FrameContext<'a> {
    pub clock: &'a FrameClock,
    pub input: &'a InputState,
    pub surface_size: (u32, u32),
}

pub trait Application {
    /// Advance the application's state, called once per frame before rendering.
    fn update(&mut self, frame: &FrameContext) -> ControlFlow;

    /// The layers to render this frame, in order. 3D content first.
    fn layers(&mut self) -> Vec<&mut dyn FrameLayer>;
}

/// The window, its surface, and the per frame clock and input.
pub struct Host {
    window: Arc<Window>,
    renderer: Renderer,
    clock: FrameClock,
    input: InputState,
}

impl Host {
    /// Opens a window of the configured size and a renderer for it.
    pub fn create_surface(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self> {
        let window_config = &config.window;
        let attributes = Window::default_attributes()
            .with_title(&window_config.title)
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("Creating window")?,
        );

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("Creating surface")?;
        let device = block_on(RenderDevice::for_surface(&instance, &surface))?;

        let size = window.inner_size();
        let renderer = Renderer::new(
            device,
            surface,
            (size.width, size.height),
            config.renderer_config(),
        );

        Ok(Self {
            window,
            renderer,
            clock: FrameClock::new(Instant::now()),
            input: InputState::default(),
        })
    }

    /// Ticks the frame clock, returns the seconds since the previous frame.
    pub fn poll_and_get_dt(&mut self) -> f64 {
        self.clock.tick(Instant::now())
    }

    pub fn present(&mut self, layers: &mut [&mut dyn FrameLayer]) -> Result<()> {
        self.renderer.render_and_present(layers)
    }
}

/// Opens the window, calls `setup` once the GPU is ready, then runs frames until the window closes
/// or the application exits.
pub fn run<A, F>(config: AppConfig, setup: F) -> Result<()>
where
    A: Application,
    F: FnOnce(&SetupContext) -> Result<A>,
{
    let event_loop = EventLoop::new()?;

    let mut handler = ShellHandler {
        config,
        setup: Some(setup),
        running: None,
        error: None,
    };

    info!("Entering event loop");
    event_loop.run_app(&mut handler)?;
    info!("Exiting event loop");

    match handler.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct ShellHandler<A, F> {
    config: AppConfig,
    setup: Option<F>,
    running: Option<Running<A>>,
    error: Option<anyhow::Error>,
}

struct Running<A> {
    host: Host,
    application: A,
}

impl<A, F> ShellHandler<A, F>
where
    A: Application,
    F: FnOnce(&SetupContext) -> Result<A>,
{
    fn start(&self, event_loop: &ActiveEventLoop, setup: F) -> Result<Running<A>> {
        let host = Host::create_surface(event_loop, &self.config)?;

        let context = SetupContext {
            device: &host.renderer.device.device,
            targets: host.renderer.targets(),
            shaders: self.config.shader_library(),
            config: &self.config,
        };
        let application = setup(&context)?;

        host.window.request_redraw();
        Ok(Running { host, application })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{e:?}");
        self.error = Some(e);
        event_loop.exit();
    }
}

impl<A> Running<A>
where
    A: Application,
{
    fn frame(&mut self) -> Result<ControlFlow> {
        let host = &mut self.host;
        host.poll_and_get_dt();

        let frame = FrameContext {
            clock: &host.clock,
            input: &host.input,
            surface_size: host.renderer.surface_size(),
        };
        if self.application.update(&frame) == ControlFlow::Exit {
            return Ok(ControlFlow::Exit);
        }

        let mut layers = self.application.layers();
        host.present(&mut layers)?;
        host.window.request_redraw();
        Ok(ControlFlow::Continue)
    }
}

impl<A, F> ApplicationHandler for ShellHandler<A, F>
where
    A: Application,
    F: FnOnce(&SetupContext) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(setup) = self.setup.take() else {
            return;
        };
        match self.start(event_loop, setup) {
            Ok(running) => self.running = Some(running),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };
        if window_id != running.host.window.id() {
            return;
        }

        running.host.input.apply(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                running
                    .host
                    .renderer
                    .resize_surface((size.width, size.height));
            }
            WindowEvent::RedrawRequested => match running.frame() {
                Ok(ControlFlow::Continue) => {}
                Ok(ControlFlow::Exit) => event_loop.exit(),
                Err(e) => self.fail(event_loop, e),
            },
            _ => {}
        }
    }
}
