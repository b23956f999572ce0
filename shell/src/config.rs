//! Demo configuration, read from TOML.
//!
//! ```toml
//! background = [0.1, 0.1, 0.1]
//! shader_dir = "shaders"
//!
//! [window]
//! width = 1024
//! height = 768
//! title = "meshtext"
//!
//! [text]
//! glyphs = "glyphs.json"
//! default_advance = 1.0
//! scale = 48.0
//! alignment = "center"
//! color = [1.0, 1.0, 1.0]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use meshtext_geometry::Color;
use meshtext_renderer::{Alignment, RendererConfig, ShaderLibrary};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub background: Color,
    pub text: TextConfig,
    /// Load `<name>.wgsl` shaders from here instead of the builtin ones.
    pub shader_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            background: Color::rgb(0.1, 0.1, 0.1),
            text: TextConfig::default(),
            shader_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "meshtext".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// The glyph mesh JSON.
    pub glyphs: Option<PathBuf>,
    /// Advance of characters that don't specify one, or have no glyph at all.
    pub default_advance: f32,
    pub scale: f32,
    pub alignment: Alignment,
    pub color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            glyphs: None,
            default_advance: 1.0,
            scale: 1.0,
            alignment: Alignment::Left,
            color: Color::WHITE,
        }
    }
}

impl AppConfig {
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let toml = fs::read_to_string(path)
            .with_context(|| format!("Reading configuration {}", path.display()))?;
        let mut config = Self::from_toml_str(&toml)
            .with_context(|| format!("Parsing configuration {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Loads the configuration from the first command line argument, or returns the default.
    pub fn from_args() -> Result<Self> {
        match std::env::args_os().nth(1) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    pub fn shader_library(&self) -> ShaderLibrary {
        match &self.shader_dir {
            Some(dir) => ShaderLibrary::from_dir(dir),
            None => ShaderLibrary::builtin(),
        }
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            background_color: Some(self.background),
            ..RendererConfig::default()
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        let paths = [self.shader_dir.as_mut(), self.text.glyphs.as_mut()];
        for path in paths.into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
background = [0.0, 0.0, 0.0, 1.0]

[window]
title = "Mesh Text"

[text]
glyphs = "glyphs.json"
alignment = "right"
color = [1.0, 0.5, 0.0]
"#,
        )
        .unwrap();

        assert_eq!(config.window.title, "Mesh Text");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.background, Color::BLACK);
        assert_eq!(config.text.alignment, Alignment::Right);
        assert_eq!(config.text.color, Color::rgb(1.0, 0.5, 0.0));
        assert_eq!(config.text.default_advance, 1.0);
        assert_eq!(config.text.glyphs, Some(PathBuf::from("glyphs.json")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_toml_str("[text]\nalignment = \"middle\"").is_err());
        assert!(AppConfig::from_toml_str("background = [1.0]").is_err());
        assert!(AppConfig::from_toml_str("[window]\nfullscreen = true").is_err());
    }

    #[test]
    fn relative_paths_resolve_against_the_config_file() {
        let mut config = AppConfig::from_toml_str(
            "shader_dir = \"shaders\"\n[text]\nglyphs = \"/abs/glyphs.json\"",
        )
        .unwrap();
        config.resolve_paths(Path::new("demos"));

        assert_eq!(config.shader_dir, Some(PathBuf::from("demos/shaders")));
        assert_eq!(config.text.glyphs, Some(PathBuf::from("/abs/glyphs.json")));
    }
}
