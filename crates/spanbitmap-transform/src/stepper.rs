//! Fixed-point scanline coordinate stepping
//!
//! An affine map has a constant per-pixel delta along a destination row, so
//! the source coordinate of every pixel in a row can be produced with two
//! integer additions. [`FixedPointRowStepper`] holds the running source
//! position in 32-bit fixed point with [`SUBPIXEL_SHIFT`] fractional bits.
//!
//! Samples are taken at destination pixel centers: the stepper for row `y`
//! starting at column `x0` is seeded with the source position of
//! `(x0 + 0.5, y + 0.5)`.
//!
//! Accumulators wrap on overflow. Rasters up to about 2^16 pixels per side
//! stay clear of that for any reasonable scale.

use crate::affine::{AffineTransform2D, Point};

/// Fractional bits of the stepper accumulators
pub const SUBPIXEL_SHIFT: u32 = 14;
/// Fixed-point value of one source pixel
pub const SUBPIXEL_SCALE: i32 = 1 << SUBPIXEL_SHIFT;
/// Mask selecting the fractional bits
pub const SUBPIXEL_MASK: i32 = SUBPIXEL_SCALE - 1;

/// One stepped source position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSample {
    /// Integer source column (floor)
    pub x: i32,
    /// Integer source row (floor)
    pub y: i32,
    /// Horizontal remainder, `0..SUBPIXEL_SCALE`
    pub frac_x: u32,
    /// Vertical remainder, `0..SUBPIXEL_SCALE`
    pub frac_y: u32,
}

/// Per-row incremental source coordinate generator
#[derive(Debug, Clone)]
pub struct FixedPointRowStepper {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

fn to_fixed(v: f64) -> i32 {
    // `as` saturates out-of-range values and maps NaN to 0
    (v * SUBPIXEL_SCALE as f64).round() as i32
}

impl FixedPointRowStepper {
    /// Seed a stepper for destination row `y`, starting at column `x0`.
    ///
    /// `inverse` maps destination coordinates to source coordinates.
    /// `offset` is subtracted from the mapped source position on both axes;
    /// bilinear sampling passes `0.5` so the integer part names the top-left
    /// of the four neighbors.
    pub fn new(inverse: &AffineTransform2D, x0: i32, y: i32, offset: f32) -> Self {
        let [a, b, tx, c, d, ty] = inverse.coeffs().map(f64::from);
        let px = x0 as f64 + 0.5;
        let py = y as f64 + 0.5;
        let sx = a * px + b * py + tx - offset as f64;
        let sy = c * px + d * py + ty - offset as f64;
        let step = inverse.transform_vector(Point::new(1.0, 0.0));
        Self {
            x: to_fixed(sx),
            y: to_fixed(sy),
            dx: to_fixed(step.x as f64),
            dy: to_fixed(step.y as f64),
        }
    }

    /// Integer source position of the current pixel.
    #[inline]
    pub fn coordinates(&self) -> (i32, i32) {
        (self.x >> SUBPIXEL_SHIFT, self.y >> SUBPIXEL_SHIFT)
    }

    /// Raw 14-bit remainders of the current pixel.
    #[inline]
    pub fn fractions(&self) -> (u32, u32) {
        ((self.x & SUBPIXEL_MASK) as u32, (self.y & SUBPIXEL_MASK) as u32)
    }

    /// Per-pixel deltas in fixed point.
    pub fn deltas(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    /// Return the integer position of the current pixel and move to the next.
    #[inline]
    pub fn advance(&mut self) -> (i32, i32) {
        let pos = self.coordinates();
        self.step();
        pos
    }

    /// Return the current position with remainders and move to the next.
    #[inline]
    pub fn advance_with_fraction(&mut self) -> StepSample {
        let (x, y) = self.coordinates();
        let (frac_x, frac_y) = self.fractions();
        self.step();
        StepSample {
            x,
            y,
            frac_x,
            frac_y,
        }
    }

    #[inline]
    fn step(&mut self) {
        self.x = self.x.wrapping_add(self.dx);
        self.y = self.y.wrapping_add(self.dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_hits_pixel_centers() {
        let m = AffineTransform2D::identity();
        let mut s = FixedPointRowStepper::new(&m, 3, 7, 0.0);
        assert_eq!(s.fractions(), (SUBPIXEL_SCALE as u32 / 2, SUBPIXEL_SCALE as u32 / 2));
        for x in 3..10 {
            assert_eq!(s.advance(), (x, 7));
        }
    }

    #[test]
    fn test_half_scale_repeats_columns() {
        // destination is twice the source, so the inverse halves
        let inv = AffineTransform2D::scale(0.5, 0.5);
        let mut s = FixedPointRowStepper::new(&inv, 0, 5, 0.0);
        let xs: Vec<i32> = (0..8).map(|_| s.advance().0).collect();
        assert_eq!(xs, vec![0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(s.coordinates().1, 2);
    }

    #[test]
    fn test_bilinear_offset() {
        let inv = AffineTransform2D::scale(0.5, 1.0);
        let mut s = FixedPointRowStepper::new(&inv, 0, 0, 0.5);
        // (0.5 * 0.5) - 0.5 = -0.25
        let first = s.advance_with_fraction();
        assert_eq!(first.x, -1);
        assert_eq!(first.frac_x, (SUBPIXEL_SCALE * 3 / 4) as u32);
        assert_eq!((first.y, first.frac_y), (0, 0));
        // 0.25 next
        let second = s.advance_with_fraction();
        assert_eq!((second.x, second.frac_x), (0, (SUBPIXEL_SCALE / 4) as u32));
    }

    #[test]
    fn test_negative_step() {
        let inv = AffineTransform2D::from_coeffs([-1.0, 0.0, 10.0, 0.0, 1.0, 0.0]);
        let mut s = FixedPointRowStepper::new(&inv, 0, 0, 0.0);
        assert_eq!(s.deltas(), (-SUBPIXEL_SCALE, 0));
        let xs: Vec<i32> = (0..4).map(|_| s.advance().0).collect();
        assert_eq!(xs, vec![9, 8, 7, 6]);
    }

    #[test]
    fn test_rotation_steps_down() {
        // 90 degree inverse: moving right in the destination moves down in the source
        let inv = AffineTransform2D::from_coeffs([0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
        let mut s = FixedPointRowStepper::new(&inv, 0, 2, 0.0);
        assert_eq!(s.advance(), (2, 0));
        assert_eq!(s.advance(), (2, 1));
        assert_eq!(s.advance(), (2, 2));
    }
}
