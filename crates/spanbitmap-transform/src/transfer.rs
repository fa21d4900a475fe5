//! Per-row pixel transfer strategies
//!
//! A transform call picks exactly one strategy up front from the format
//! pair, the opacity and the sample filter:
//!
//! | Strategy | When | Per pixel |
//! |---|---|---|
//! | [`Direct`](TransferStrategy::Direct) | same format, opacity 1, nearest | byte copy |
//! | [`Convert`](TransferStrategy::Convert) | opacity 1, otherwise | sample, convert, overwrite |
//! | [`Compose`](TransferStrategy::Compose) | opacity below 1 | sample premultiplied, blend source-over |
//!
//! Direct and Convert leave destination pixels whose sample misses the
//! source untouched. Compose treats such samples as fully transparent.

use spanbitmap_core::{Bgrp32, PixelCodec, PixelFormat, convert};

use crate::sampler::QuantizedSampler;
use crate::stepper::FixedPointRowStepper;
use crate::transform::SampleFilter;

/// How source pixels reach the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStrategy {
    /// Byte-for-byte copy of the nearest source pixel
    Direct,
    /// Sample in the source format, convert, overwrite
    Convert,
    /// Blend over the existing destination pixel
    Compose,
}

impl TransferStrategy {
    /// Pick the strategy for a transfer.
    ///
    /// `opacity` is expected to be already validated to `0.0..=1.0`.
    pub fn select(src: PixelFormat, dst: PixelFormat, opacity: f32, filter: SampleFilter) -> Self {
        if opacity < 1.0 {
            Self::Compose
        } else if src == dst && filter == SampleFilter::Nearest {
            Self::Direct
        } else {
            Self::Convert
        }
    }
}

/// Quantize an opacity in `0.0..=1.0` to a `0..=256` factor.
///
/// Truncates, so anything below 1.0 stays below 256.
pub fn opacity_factor(opacity: f32) -> u32 {
    (opacity.clamp(0.0, 1.0) * 256.0) as u32
}

/// Copy the nearest source pixel bytes into each destination pixel.
///
/// Source and destination must share a format.
pub(crate) fn direct_row<P: PixelCodec>(
    sampler: &QuantizedSampler<'_, P>,
    stepper: &mut FixedPointRowStepper,
    dst_row: &mut [u8],
) {
    for dst in dst_row.chunks_exact_mut(P::FORMAT.byte_size()) {
        let (sx, sy) = stepper.advance();
        if let Some(src) = sampler.fetch_bytes(sx, sy) {
            dst.copy_from_slice(src);
        }
    }
}

/// Sample, convert from `S` to `D` and overwrite.
pub(crate) fn convert_row<S: PixelCodec, D: PixelCodec>(
    sampler: &QuantizedSampler<'_, S>,
    stepper: &mut FixedPointRowStepper,
    filter: SampleFilter,
    dst_row: &mut [u8],
) {
    let pixels = dst_row.chunks_exact_mut(D::FORMAT.byte_size());
    match filter {
        SampleFilter::Nearest => {
            for dst in pixels {
                let (sx, sy) = stepper.advance();
                if let Some(src) = sampler.fetch_bytes(sx, sy) {
                    convert::<S, D>(S::read(src)).write(dst);
                }
            }
        }
        SampleFilter::Bilinear => {
            for dst in pixels {
                let s = stepper.advance_with_fraction();
                if sampler.touches(s.x, s.y) {
                    let px: D = sampler.bilinear(s.x, s.y, s.frac_x, s.frac_y);
                    px.write(dst);
                }
            }
        }
    }
}

/// Blend `src` scaled by `factor / 256` over the encoded destination pixel.
#[inline]
fn compose_pixel<D: PixelCodec>(src: Bgrp32, factor: u32, dst: &mut [u8]) {
    // fully transparent sources never touch the destination
    if src.a == 0 {
        return;
    }
    let under = D::read(dst).to_premul();
    D::from_premul(src.scale(factor).over(under)).write(dst);
}

/// Sample as premultiplied, scale by `factor / 256` and blend source-over.
pub(crate) fn compose_row<S: PixelCodec, D: PixelCodec>(
    sampler: &QuantizedSampler<'_, S>,
    stepper: &mut FixedPointRowStepper,
    filter: SampleFilter,
    factor: u32,
    dst_row: &mut [u8],
) {
    let pixels = dst_row.chunks_exact_mut(D::FORMAT.byte_size());
    match filter {
        SampleFilter::Nearest => {
            for dst in pixels {
                let (sx, sy) = stepper.advance();
                if let Some(src) = sampler.fetch_bytes(sx, sy) {
                    compose_pixel::<D>(S::read(src).to_premul(), factor, dst);
                }
            }
        }
        SampleFilter::Bilinear => {
            for dst in pixels {
                let s = stepper.advance_with_fraction();
                let src = sampler.bilinear_or(s.x, s.y, s.frac_x, s.frac_y, Bgrp32::TRANSPARENT);
                compose_pixel::<D>(src, factor, dst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::AffineTransform2D;
    use spanbitmap_core::{Bgr24, Bgra32, RasterView};

    #[test]
    fn test_select() {
        use SampleFilter::*;
        let (a, b) = (PixelFormat::BGRA32, PixelFormat::BGR24);
        assert_eq!(TransferStrategy::select(a, a, 1.0, Nearest), TransferStrategy::Direct);
        assert_eq!(TransferStrategy::select(a, a, 1.0, Bilinear), TransferStrategy::Convert);
        assert_eq!(TransferStrategy::select(a, b, 1.0, Nearest), TransferStrategy::Convert);
        assert_eq!(TransferStrategy::select(a, a, 0.5, Nearest), TransferStrategy::Compose);
        assert_eq!(TransferStrategy::select(a, b, 0.99, Bilinear), TransferStrategy::Compose);
    }

    #[test]
    fn test_opacity_factor_truncates() {
        assert_eq!(opacity_factor(1.0), 256);
        assert_eq!(opacity_factor(0.5), 128);
        assert_eq!(opacity_factor(0.999), 255);
        assert_eq!(opacity_factor(0.0), 0);
    }

    #[test]
    fn test_direct_row_skips_outside() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let view = RasterView::from_continuous(2, 1, PixelFormat::BGR24, &src).unwrap();
        let sampler = QuantizedSampler::<Bgr24>::new(view).unwrap();
        // shift the source one pixel right
        let inv = AffineTransform2D::translation(-1.0, 0.0);
        let mut stepper = FixedPointRowStepper::new(&inv, 0, 0, 0.0);
        let mut dst = [9u8; 9];
        direct_row(&sampler, &mut stepper, &mut dst);
        assert_eq!(dst, [9, 9, 9, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_compose_half_over_black() {
        let mut src = [0u8; 4];
        Bgra32::opaque(200, 100, 0).write(&mut src);
        let view = RasterView::from_continuous(1, 1, PixelFormat::BGRA32, &src).unwrap();
        let sampler = QuantizedSampler::<Bgra32>::new(view).unwrap();
        let mut stepper = FixedPointRowStepper::new(&AffineTransform2D::identity(), 0, 0, 0.0);
        let mut dst = [0u8; 3];
        compose_row::<Bgra32, Bgr24>(&sampler, &mut stepper, SampleFilter::Nearest, 128, &mut dst);
        // b, g, r over opaque black at half strength
        assert_eq!(dst, [0, 50, 100]);
    }

    #[test]
    fn test_compose_transparent_is_noop() {
        let src = [0u8; 4];
        let view = RasterView::from_continuous(1, 1, PixelFormat::BGRA32, &src).unwrap();
        let sampler = QuantizedSampler::<Bgra32>::new(view).unwrap();
        let mut stepper = FixedPointRowStepper::new(&AffineTransform2D::identity(), 0, 0, 0.0);
        let mut dst = [7u8, 8, 9, 10];
        compose_row::<Bgra32, Bgra32>(&sampler, &mut stepper, SampleFilter::Bilinear, 200, &mut dst);
        assert_eq!(dst, [7, 8, 9, 10]);
    }
}
