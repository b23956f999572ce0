use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while loading and packing a glyph source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read glyph source {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed glyph source: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("glyph key {0:?} must be exactly one character")]
    InvalidKey(String),

    #[error("glyph source contains no glyphs")]
    Empty,

    #[error("glyph {character:?}: {floats} vertex floats is not a multiple of 8")]
    VertexLayout { character: char, floats: usize },

    #[error("glyph {character:?}: {indices} indices do not form whole triangles")]
    IncompleteTriangle { character: char, indices: usize },

    #[error("glyph {character:?}: index {index} out of range, glyph has {vertex_count} vertices")]
    IndexOutOfRange {
        character: char,
        index: u32,
        vertex_count: usize,
    },

    #[error("atlas with {vertex_count} vertices exceeds 32 bit indices")]
    TooLarge { vertex_count: usize },

    #[error("atlas with {index_count} indices exceeds 32 bit index ranges")]
    TooManyIndices { index_count: usize },
}

/// Failures while loading, compiling and linking shaders.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader {name:?} not found in {dir}")]
    NotFound { name: String, dir: PathBuf },

    #[error("failed to read shader {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{label} shader compilation failed:\n{message}")]
    Compile { label: String, message: String },

    #[error("{label} pipeline linking failed:\n{message}")]
    Link { label: String, message: String },
}
