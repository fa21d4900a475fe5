//! Clamped nearest and bilinear source sampling
//!
//! [`QuantizedSampler`] binds a source [`RasterView`] to its codec. Reads
//! outside the raster yield a default pixel instead of failing, so the inner
//! loops never bounds-check against the caller.
//!
//! Bilinear weights arrive from the stepper with 14 fractional bits and are
//! shifted down by [`FRACTION_TO_LERP_SHIFT`] into the 10-bit domain of
//! [`PixelCodec::lerp4`].

use spanbitmap_core::{
    Error as CoreError, LERP_SHIFT, PixelCodec, RasterView, Result as CoreResult, convert,
};

use crate::stepper::SUBPIXEL_SHIFT;

/// Shift from stepper fractions to codec interpolation weights
pub const FRACTION_TO_LERP_SHIFT: u32 = SUBPIXEL_SHIFT - LERP_SHIFT;

/// Read-only sampler over a source raster of codec `P`
#[derive(Debug, Clone, Copy)]
pub struct QuantizedSampler<'a, P: PixelCodec> {
    view: RasterView<'a>,
    default: P,
    width: i32,
    height: i32,
}

impl<'a, P: PixelCodec> QuantizedSampler<'a, P> {
    /// Bind `view`, which must be encoded as `P`.
    ///
    /// # Errors
    ///
    /// Returns [`spanbitmap_core::Error::FormatMismatch`] if the view's
    /// format is not `P::FORMAT`.
    pub fn new(view: RasterView<'a>) -> CoreResult<Self> {
        if view.format() != P::FORMAT {
            return Err(CoreError::FormatMismatch {
                expected: view.format(),
                actual: P::FORMAT,
            });
        }
        Ok(Self {
            view,
            default: P::default(),
            width: view.width().min(i32::MAX as u32) as i32,
            height: view.height().min(i32::MAX as u32) as i32,
        })
    }

    /// Use `default` for reads outside the raster.
    pub fn with_default(mut self, default: P) -> Self {
        self.default = default;
        self
    }

    pub fn view(&self) -> &RasterView<'a> {
        &self.view
    }

    /// Pixel returned for out-of-range reads.
    pub fn default_pixel(&self) -> P {
        self.default
    }

    /// Whether (x, y) is a source pixel.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Whether any of the four bilinear neighbors of (x, y) is a source pixel.
    #[inline]
    pub fn touches(&self, x: i32, y: i32) -> bool {
        x >= -1 && y >= -1 && x < self.width && y < self.height
    }

    /// Encoded bytes of (x, y), or `None` outside the raster.
    #[inline]
    pub fn fetch_bytes(&self, x: i32, y: i32) -> Option<&'a [u8]> {
        self.contains(x, y)
            .then(|| self.view.pixel_bytes(x as u32, y as u32))
    }

    /// Pixel at (x, y), or the default pixel outside the raster.
    #[inline]
    pub fn fetch(&self, x: i32, y: i32) -> P {
        match self.fetch_bytes(x, y) {
            Some(bytes) => P::read(bytes),
            None => self.default,
        }
    }

    /// Nearest pixel converted to codec `T`.
    #[inline]
    pub fn nearest<T: PixelCodec>(&self, x: i32, y: i32) -> T {
        convert::<P, T>(self.fetch(x, y))
    }

    /// Bilinear blend of the neighbors of (x, y) in codec `T`.
    ///
    /// `frac_x` and `frac_y` are stepper remainders (14 bits). Neighbors
    /// outside the raster contribute the default pixel.
    #[inline]
    pub fn bilinear<T: PixelCodec>(&self, x: i32, y: i32, frac_x: u32, frac_y: u32) -> T {
        self.bilinear_or(x, y, frac_x, frac_y, convert::<P, T>(self.default))
    }

    /// Bilinear blend where neighbors outside the raster contribute `outside`.
    #[inline]
    pub fn bilinear_or<T: PixelCodec>(
        &self,
        x: i32,
        y: i32,
        frac_x: u32,
        frac_y: u32,
        outside: T,
    ) -> T {
        let at = |sx: i32, sy: i32| match self.fetch_bytes(sx, sy) {
            Some(bytes) => convert::<P, T>(P::read(bytes)),
            None => outside,
        };
        let p00 = at(x, y);
        let p10 = at(x.wrapping_add(1), y);
        let p01 = at(x, y.wrapping_add(1));
        let p11 = at(x.wrapping_add(1), y.wrapping_add(1));
        T::lerp4(
            p00,
            p10,
            p01,
            p11,
            frac_x >> FRACTION_TO_LERP_SHIFT,
            frac_y >> FRACTION_TO_LERP_SHIFT,
        )
    }
}
