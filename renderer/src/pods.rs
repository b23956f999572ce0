use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use static_assertions::{const_assert, const_assert_eq};
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexStepMode};

use meshtext_geometry::RowMajor4;

// We need this for Rust to store our data correctly for the shaders
#[repr(C)]
// This is so we can store this in a buffer
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Matrix4(pub [[f32; 4]; 4]);

const_assert_eq!(size_of::<Matrix4>() % 16, 0);

/// RGBA color
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Color(pub [f32; 4]);

const_assert_eq!(size_of::<Color>() % 16, 0);

impl From<meshtext_geometry::Color> for Color {
    fn from(value: meshtext_geometry::Color) -> Self {
        Self(value.to_array())
    }
}

/// A position only vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
        }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

        VertexBufferLayout {
            array_stride: size_of::<Vertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// A glyph mesh vertex, laid out exactly like the 8 floats of the glyph source.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

const_assert_eq!(size_of::<GlyphVertex>(), 8 * size_of::<f32>());

impl GlyphVertex {
    /// Builds a vertex from one 8 float chunk.
    pub fn from_floats(f: &[f32; 8]) -> Self {
        Self {
            position: [f[0], f[1], f[2]],
            normal: [f[3], f[4], f[5]],
            tex_coords: [f[6], f[7]],
        }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

        VertexBufferLayout {
            array_stride: size_of::<GlyphVertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

/// A per instance model matrix, column-major, fed to the vertex shader as four `vec4` columns.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub columns: [[f32; 4]; 4],
}

impl InstanceTransform {
    pub fn layout() -> VertexBufferLayout<'static> {
        const ATTRS: [VertexAttribute; 4] = wgpu::vertex_attr_array![
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4
        ];

        VertexBufferLayout {
            array_stride: size_of::<InstanceTransform>() as BufferAddress,
            step_mode: VertexStepMode::Instance,
            attributes: &ATTRS,
        }
    }
}

impl From<&RowMajor4> for InstanceTransform {
    fn from(m: &RowMajor4) -> Self {
        Self {
            columns: m.to_column_major(),
        }
    }
}

/// Push constants shared by all pipelines: one matrix and one color.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MatrixColor {
    pub matrix: Matrix4,
    pub color: Color,
}

impl MatrixColor {
    pub const SIZE: u32 = size_of::<MatrixColor>() as u32;

    pub fn new(matrix: &glam::Mat4, color: meshtext_geometry::Color) -> Self {
        Self {
            matrix: matrix.to_pod(),
            color: color.into(),
        }
    }
}

// Push constant limit guaranteed by most backends.
const_assert!(size_of::<MatrixColor>() <= 128);

pub trait ToPod {
    type Pod;
    fn to_pod(&self) -> Self::Pod;
}

impl ToPod for glam::Mat4 {
    type Pod = Matrix4;

    fn to_pod(&self) -> Self::Pod {
        Matrix4(self.to_cols_array_2d())
    }
}

pub trait AsBytes {
    fn as_bytes(&self) -> &[u8];
}

impl<T: Pod> AsBytes for T {
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
