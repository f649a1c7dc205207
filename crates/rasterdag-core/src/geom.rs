//! Affine geometry: points, the user-facing float matrix, and its
//! fixed-point inverse.

use crate::error::{Error, Result};
use crate::fixed::{Fixed16, Fixed8};

/// A 2D point in fixed8 pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: Fixed8,
    /// Y coordinate.
    pub y: Fixed8,
}

impl Point {
    /// Creates a point from fixed8 coordinates.
    #[inline]
    pub const fn new(x: Fixed8, y: Fixed8) -> Self {
        Point { x, y }
    }

    /// Creates a point from plain integer pixel coordinates.
    #[inline]
    pub const fn from_int(x: i32, y: i32) -> Self {
        Point {
            x: Fixed8::to_fixed8(x),
            y: Fixed8::to_fixed8(y),
        }
    }
}

/// Minimum absolute determinant below which an [`AffineMatrix`] is
/// considered singular and [`AffineMatrix::invert`] fails.
pub const DET_EPSILON: f64 = 1.0e-6;

/// A user-supplied affine transform mapping source coordinates to
/// destination coordinates: `dst = M * src + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix {
    /// Row 0, column 0.
    pub a: f64,
    /// Row 0, column 1.
    pub b: f64,
    /// Row 1, column 0.
    pub c: f64,
    /// Row 1, column 1.
    pub d: f64,
    /// Translation along x.
    pub tx: f64,
    /// Translation along y.
    pub ty: f64,
}

impl AffineMatrix {
    /// The identity transform.
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Builds a rotation (in radians) about the origin composed with a
    /// uniform scale, a convenience constructor used by tests and the
    /// reference CLI.
    pub fn rotation_scale(radians: f64, scale: f64) -> Self {
        let (s, c) = radians.sin_cos();
        AffineMatrix {
            a: c * scale,
            b: -s * scale,
            c: s * scale,
            d: c * scale,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Returns the determinant of the 2x2 linear part.
    #[inline]
    pub fn det(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverts this matrix into fixed16 coefficients mapping destination
    /// coordinates back to source coordinates, failing if the matrix is
    /// singular (`|det| < `[`DET_EPSILON`]).
    pub fn invert(&self) -> Result<InvMatrix> {
        let det = self.det();
        if det.abs() < DET_EPSILON {
            return Err(Error::singular_matrix(det));
        }
        let inv_a = self.d / det;
        let inv_b = -self.b / det;
        let inv_c = -self.c / det;
        let inv_d = self.a / det;
        let inv_tx = -(inv_a * self.tx + inv_b * self.ty);
        let inv_ty = -(inv_c * self.tx + inv_d * self.ty);
        Ok(InvMatrix {
            a: Fixed16::from_f64(inv_a),
            b: Fixed16::from_f64(inv_b),
            c: Fixed16::from_f64(inv_c),
            d: Fixed16::from_f64(inv_d),
            tx: Fixed16::from_f64(inv_tx),
            ty: Fixed16::from_f64(inv_ty),
        })
    }
}

/// Fixed16 coefficients of the inverse affine transform: maps a
/// destination `(dx, dy)` to a source `(srcX, srcY)`.
///
/// `srcX = a*dx + b*dy + tx`, `srcY = c*dx + d*dy + ty`, all in
/// fixed16 arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvMatrix {
    /// Coefficient of destination x in the source-x equation.
    pub a: Fixed16,
    /// Coefficient of destination y in the source-x equation.
    pub b: Fixed16,
    /// Coefficient of destination x in the source-y equation.
    pub c: Fixed16,
    /// Coefficient of destination y in the source-y equation.
    pub d: Fixed16,
    /// Source-x translation.
    pub tx: Fixed16,
    /// Source-y translation.
    pub ty: Fixed16,
}

impl InvMatrix {
    /// Computes the fixed16 row base for source-x at destination row
    /// `dy`: `b*dy + tx`.
    #[inline]
    pub fn row_base_x(&self, dy: i32) -> Fixed16 {
        self.b * dy + self.tx
    }

    /// Computes the fixed16 row base for source-y at destination row
    /// `dy`: `d*dy + ty`.
    #[inline]
    pub fn row_base_y(&self, dy: i32) -> Fixed16 {
        self.d * dy + self.ty
    }
}
