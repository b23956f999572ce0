//! Geometry primitives shared by the renderer and the shell.

mod color;
mod projection;
mod row_major;

pub use color::*;
pub use projection::*;
pub use row_major::*;

pub type Matrix4 = glam::Mat4;
pub type Vector2 = glam::Vec2;
pub type Vector3 = glam::Vec3;
