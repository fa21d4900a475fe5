//! Affine transformation matrices
//!
//! # Affine Matrix
//!
//! An affine transformation is represented as:
//! ```text
//! | a  b  tx |
//! | c  d  ty |
//! | 0  0  1  |
//! ```
//!
//! The transformation equations are:
//! ```text
//! x' = a*x + b*y + tx
//! y' = c*x + d*y + ty
//! ```
//!
//! Matrices passed to the raster engines are *placement* matrices: they map
//! source coordinates to destination coordinates. The engines invert them
//! once per call to step through the source from the destination side.

use crate::error::{TransformError, TransformResult};

/// A 2D point with floating-point coordinates
///
/// Used as control points and as the result of coordinate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D affine transformation matrix (6 coefficients)
///
/// Represents the transformation:
/// ```text
/// x' = coeffs[0]*x + coeffs[1]*y + coeffs[2]
/// y' = coeffs[3]*x + coeffs[4]*y + coeffs[5]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform2D {
    /// Coefficients [a, b, tx, c, d, ty]
    coeffs: [f32; 6],
}

impl Default for AffineTransform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform2D {
    /// Create the identity transformation
    pub fn identity() -> Self {
        Self::from_coeffs([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// Create from raw coefficients `[a, b, tx, c, d, ty]`
    pub fn from_coeffs(coeffs: [f32; 6]) -> Self {
        Self { coeffs }
    }

    /// Get the raw coefficients
    pub fn coeffs(&self) -> &[f32; 6] {
        &self.coeffs
    }

    /// Create a translation matrix
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::from_coeffs([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    /// Create a scaling matrix
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::from_coeffs([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Create a rotation matrix about a given center
    ///
    /// `angle` is in radians. With y pointing down, a positive angle turns
    /// clockwise on screen.
    pub fn rotation(center_x: f32, center_y: f32, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        // translate center to origin, rotate, translate back
        let tx = center_x - cos * center_x + sin * center_y;
        let ty = center_y - sin * center_x - cos * center_y;
        Self::from_coeffs([cos, -sin, tx, sin, cos, ty])
    }

    /// Compute the matrix mapping three source points onto three
    /// destination points
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::SingularMatrix`] if the source points are
    /// collinear.
    pub fn from_three_points(src_pts: [Point; 3], dst_pts: [Point; 3]) -> TransformResult<Self> {
        let [p0, p1, p2] = src_pts.map(|p| (p.x as f64, p.y as f64));
        // | x0 y0 1 |
        // | x1 y1 1 |
        // | x2 y2 1 |
        let det = p0.0 * (p1.1 - p2.1) - p0.1 * (p1.0 - p2.0) + (p1.0 * p2.1 - p2.0 * p1.1);
        if !det.is_normal() {
            return Err(TransformError::SingularMatrix);
        }

        // Cramer's rule, once for x' and once for y'
        let solve = |v: [f64; 3]| {
            let a = (v[0] * (p1.1 - p2.1) - p0.1 * (v[1] - v[2]) + (v[1] * p2.1 - v[2] * p1.1)) / det;
            let b = (p0.0 * (v[1] - v[2]) - v[0] * (p1.0 - p2.0) + (p1.0 * v[2] - p2.0 * v[1])) / det;
            let t = (p0.0 * (p1.1 * v[2] - p2.1 * v[1]) - p0.1 * (p1.0 * v[2] - p2.0 * v[1])
                + v[0] * (p1.0 * p2.1 - p2.0 * p1.1))
                / det;
            [a as f32, b as f32, t as f32]
        };
        let [a, b, tx] = solve(dst_pts.map(|p| p.x as f64));
        let [c, d, ty] = solve(dst_pts.map(|p| p.y as f64));
        Ok(Self::from_coeffs([a, b, tx, c, d, ty]))
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> f32 {
        let [a, b, _, c, d, _] = self.coeffs;
        a * d - b * c
    }

    /// Whether this is exactly the identity
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Compute the inverse transformation
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::SingularMatrix`] if the determinant is zero,
    /// subnormal or not finite.
    pub fn inverse(&self) -> TransformResult<Self> {
        let [a, b, tx, c, d, ty] = self.coeffs.map(f64::from);
        let det = a * d - b * c;
        if !det.is_normal() {
            return Err(TransformError::SingularMatrix);
        }
        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;
        let itx = -(ia * tx + ib * ty);
        let ity = -(ic * tx + id * ty);
        let inv = [ia, ib, itx, ic, id, ity].map(|v| v as f32);
        if inv.iter().any(|v| !v.is_finite()) {
            return Err(TransformError::SingularMatrix);
        }
        Ok(Self::from_coeffs(inv))
    }

    /// Compose two affine transformations (self * other)
    ///
    /// The result applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let [a1, b1, tx1, c1, d1, ty1] = self.coeffs;
        let [a2, b2, tx2, c2, d2, ty2] = other.coeffs;
        Self::from_coeffs([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            a1 * tx2 + b1 * ty2 + tx1,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            c1 * tx2 + d1 * ty2 + ty1,
        ])
    }

    /// Apply `self`, then `next`
    pub fn then(&self, next: &Self) -> Self {
        next.compose(self)
    }

    /// Transform a point through this matrix
    pub fn transform_point(&self, pt: Point) -> Point {
        let [a, b, tx, c, d, ty] = self.coeffs;
        Point::new(a * pt.x + b * pt.y + tx, c * pt.x + d * pt.y + ty)
    }

    /// Transform a direction vector (translation ignored)
    pub fn transform_vector(&self, v: Point) -> Point {
        let [a, b, _, c, d, _] = self.coeffs;
        Point::new(a * v.x + b * v.y, c * v.x + d * v.y)
    }

    /// Bounding box of the rectangle `(0, 0)-(width, height)` after mapping
    ///
    /// Returns the (min, max) corners.
    pub fn transform_bounds(&self, width: f32, height: f32) -> (Point, Point) {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(0.0, height),
            Point::new(width, height),
        ]
        .map(|p| self.transform_point(p));

        let mut min = corners[0];
        let mut max = corners[0];
        for p in &corners[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}
