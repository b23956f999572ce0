use crate::Matrix4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(aspect: f32, near: f32, far: f32) -> Self {
        Self { aspect, near, far }
    }

    /// A projection for a surface of the given pixel size.
    ///
    /// A zero height is treated as one pixel.
    pub fn for_surface((width, height): (u32, u32), near: f32, far: f32) -> Self {
        Self::new(width as f32 / height.max(1) as f32, near, far)
    }

    /// Create a perspective projection matrix, `fovy` in degrees.
    pub fn perspective_matrix(&self, fovy: f32) -> Matrix4 {
        Matrix4::perspective_rh(fovy.to_radians(), self.aspect, self.near, self.far)
    }
}

/// An orthographic projection, depth mapped to wgpu's `0..1` range.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4 {
    Matrix4::orthographic_rh(left, right, bottom, top, near, far)
}

/// Pixel space, origin at the bottom left, y pointing up.
pub fn pixel_projection_y_up((width, height): (u32, u32)) -> Matrix4 {
    orthographic(0.0, width as f32, 0.0, height as f32, -1.0, 1.0)
}

/// Pixel space, origin at the top left, y pointing down.
pub fn pixel_projection_y_down((width, height): (u32, u32)) -> Matrix4 {
    orthographic(0.0, width as f32, height as f32, 0.0, -1.0, 1.0)
}
