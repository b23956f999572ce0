use anyhow::Result;

use meshtext_renderer::{CubeRenderer, FrameLayer, OverlayRenderer};
use meshtext_shell::{self as shell, AppConfig, ControlFlow, FrameContext, Key};

struct CubeDemo {
    cube: CubeRenderer,
    overlay: OverlayRenderer,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_args()?;
    shell::run(config, |setup| {
        Ok(CubeDemo {
            cube: CubeRenderer::new(setup.device, setup.targets, &setup.shaders)?,
            overlay: OverlayRenderer::new(setup.device, setup.targets, &setup.shaders)?,
        })
    })
}

impl shell::Application for CubeDemo {
    fn update(&mut self, frame: &FrameContext) -> ControlFlow {
        if frame.input.is_pressed(Key::Escape) {
            return ControlFlow::Exit;
        }
        self.cube.angle = frame.clock.current_time() as f32;
        ControlFlow::Continue
    }

    fn layers(&mut self) -> Vec<&mut dyn FrameLayer> {
        vec![&mut self.cube, &mut self.overlay]
    }
}
