use std::ops::Mul;

use crate::Matrix4;

/// A 4x4 matrix stored row by row.
///
/// Uses the column vector convention (`M * v`), so translations live in the last column:
/// `rows[0][3]`, `rows[1][3]`, `rows[2][3]`.
///
/// GPU consumers expect column-major data, see [`RowMajor4::to_column_major`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowMajor4 {
    pub rows: [[f32; 4]; 4],
}

impl Default for RowMajor4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RowMajor4 {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[0][3] = x;
        m.rows[1][3] = y;
        m.rows[2][3] = z;
        m
    }

    pub fn from_scale(sx: f32, sy: f32, sz: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[0][0] = sx;
        m.rows[1][1] = sy;
        m.rows[2][2] = sz;
        m
    }

    pub fn translation(&self) -> [f32; 3] {
        [self.rows[0][3], self.rows[1][3], self.rows[2][3]]
    }

    pub fn transpose(&self) -> Self {
        let mut t = [[0.0; 4]; 4];
        for (r, row) in self.rows.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                t[c][r] = *v;
            }
        }
        Self { rows: t }
    }

    /// Converts to the column-major layout GPU buffers and WGSL `mat4x4<f32>` expect.
    ///
    /// Element `[c][r]` of the result is element `[r][c]` of `self`.
    pub fn to_column_major(&self) -> [[f32; 4]; 4] {
        self.transpose().rows
    }

    pub fn to_matrix4(&self) -> Matrix4 {
        Matrix4::from_cols_array_2d(&self.to_column_major())
    }
}

impl Mul for RowMajor4 {
    type Output = RowMajor4;

    fn mul(self, rhs: RowMajor4) -> Self::Output {
        let mut m = [[0.0; 4]; 4];
        for (r, row) in m.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        RowMajor4 { rows: m }
    }
}

impl From<Matrix4> for RowMajor4 {
    fn from(m: Matrix4) -> Self {
        Self {
            rows: m.transpose().to_cols_array_2d(),
        }
    }
}
