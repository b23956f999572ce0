use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};

use futures::executor::block_on;
use log::info;

use crate::ShaderError;

const BUILTIN: &[(&str, &str)] = &[
    ("text", include_str!("shaders/text.wgsl")),
    ("cube", include_str!("shaders/cube.wgsl")),
    ("overlay", include_str!("shaders/overlay.wgsl")),
];

const EXTENSION: &str = "wgsl";

/// Where WGSL sources come from.
#[derive(Debug, Clone, Default)]
pub enum ShaderLibrary {
    /// Sources compiled into the binary.
    #[default]
    Builtin,
    /// `<name>.wgsl` files in a directory.
    Directory(PathBuf),
}

impl ShaderLibrary {
    pub fn builtin() -> Self {
        Self::Builtin
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    pub fn source(&self, name: &str) -> Result<Cow<'static, str>, ShaderError> {
        match self {
            Self::Builtin => BUILTIN
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, src)| Cow::Borrowed(*src))
                .ok_or_else(|| ShaderError::NotFound {
                    name: name.into(),
                    dir: PathBuf::from("<builtin>"),
                }),
            Self::Directory(dir) => read_source(dir, name).map(Cow::Owned),
        }
    }

    /// Loads and compiles the shader `name`.
    pub fn compile(
        &self,
        device: &wgpu::Device,
        name: &str,
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        let source = self.source(name)?;
        compile_shader(device, name, &source)
    }
}

fn read_source(dir: &Path, name: &str) -> Result<String, ShaderError> {
    let path = dir.join(format!("{name}.{EXTENSION}"));
    info!("Loading shader {}", path.display());
    fs::read_to_string(&path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ShaderError::NotFound {
            name: name.into(),
            dir: dir.to_owned(),
        },
        _ => ShaderError::Io { path, source },
    })
}

/// Compiles WGSL, reporting validation failures as [`ShaderError::Compile`].
pub fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            label: label.into(),
            message: error.to_string(),
        });
    }
    Ok(module)
}
