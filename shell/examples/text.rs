//! Draws a few strings with the glyph meshes from `assets/glyphs.json`.
//!
//! Run with `cargo run --example text -- shell/examples/assets/demo.toml`.

use anyhow::{Context, Result};
use log::info;

use meshtext_geometry::Vector2;
use meshtext_renderer::{
    Alignment, CubeRenderer, FrameLayer, GlyphAtlas, GlyphSource, TextRenderer,
};
use meshtext_shell::{self as shell, AppConfig, ControlFlow, FrameContext, Key, TextConfig};

const DEFAULT_GLYPHS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/assets/glyphs.json");

struct TextDemo {
    cube: CubeRenderer,
    text: TextRenderer,
    style: TextConfig,
    show_cube: bool,
    space_was_pressed: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::from_args()?;
    shell::run(config, |setup| {
        let style = setup.config.text.clone();
        let glyphs = style
            .glyphs
            .clone()
            .unwrap_or_else(|| DEFAULT_GLYPHS.into());

        let source = GlyphSource::load(&glyphs)
            .with_context(|| format!("Loading glyphs from {}", glyphs.display()))?;
        let atlas = GlyphAtlas::build(&source, style.default_advance)?;
        info!(
            "{} glyphs, {} vertices",
            atlas.len(),
            atlas.vertex_count()
        );

        Ok(TextDemo {
            cube: CubeRenderer::new(setup.device, setup.targets, &setup.shaders)?,
            text: TextRenderer::new(setup.device, setup.targets, &setup.shaders, atlas)?,
            style,
            show_cube: true,
            space_was_pressed: false,
        })
    })
}

impl shell::Application for TextDemo {
    fn update(&mut self, frame: &FrameContext) -> ControlFlow {
        let input = frame.input;
        if input.is_pressed(Key::Escape) {
            return ControlFlow::Exit;
        }

        let space = input.is_pressed(Key::Space);
        if space && !self.space_was_pressed {
            self.show_cube = !self.show_cube;
        }
        self.space_was_pressed = space;

        let time = frame.clock.current_time() as f32;
        self.cube.angle = time;

        let (width, height) = frame.surface_size;
        let (width, height) = (width as f32, height as f32);
        let scale = self.style.scale;
        let color = self.style.color;
        let line_height = scale * 7.0;

        self.text.draw_text(
            "MESH TEXT",
            (width / 2.0, height / 2.0 + line_height),
            scale * 1.5,
            color,
            self.style.alignment,
        );
        self.text
            .draw_text("LEFT", (20.0, 20.0), scale, color, Alignment::Left);
        self.text.draw_text(
            "RIGHT",
            (width - 20.0, 20.0),
            scale,
            color,
            Alignment::Right,
        );

        if let Some(cursor) = input.cursor_position() {
            // Cursor coordinates are y-down, text is placed y-up.
            let position = Vector2::new(cursor.x, height - cursor.y);
            self.text.draw_text(
                "X",
                position,
                scale * 0.5,
                color.with_alpha(0.5),
                Alignment::Center,
            );
        }

        self.text.draw_text(
            &format!("{:.0}", time),
            (width / 2.0, 20.0),
            scale,
            color,
            Alignment::Center,
        );

        ControlFlow::Continue
    }

    fn layers(&mut self) -> Vec<&mut dyn FrameLayer> {
        let mut layers: Vec<&mut dyn FrameLayer> = Vec::new();
        if self.show_cube {
            layers.push(&mut self.cube);
        }
        layers.push(&mut self.text);
        layers
    }
}
