//! Affine raster transform
//!
//! Copies a source raster into a destination raster under a placement
//! matrix, converting formats, resampling and compositing on the way.
//!
//! # Algorithm
//!
//! 1. Validate opacity and the format pair, then invert the placement
//!    matrix.
//! 2. Map the source corners forward and intersect their integer bounding
//!    box with the destination. An empty intersection is a no-op.
//! 3. Walk each destination row of the clip rectangle with a fresh
//!    [`FixedPointRowStepper`] and hand the row to the selected
//!    [`TransferStrategy`].
//!
//! Nothing outside the clip rectangle is ever written, and the destination
//! is never cleared; fill it first if a background is wanted.

use spanbitmap_core::{FormatPairVisitor, PixelCodec, RasterView, RasterViewMut, visit_pair};
use tracing::{debug, trace};

use crate::affine::AffineTransform2D;
use crate::error::{TransformError, TransformResult};
use crate::sampler::QuantizedSampler;
use crate::stepper::FixedPointRowStepper;
use crate::transfer::{self, TransferStrategy, opacity_factor};

/// Source sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFilter {
    /// Nearest source pixel
    #[default]
    Nearest,
    /// Blend of the four nearest source pixels
    Bilinear,
}

/// Options for an affine transform call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    /// Source opacity in `0.0..=1.0`
    pub opacity: f32,
    /// Sampling filter
    pub filter: SampleFilter,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            filter: SampleFilter::Nearest,
        }
    }
}

impl TransformOptions {
    /// Create options with a specific opacity
    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity,
            ..Default::default()
        }
    }

    /// Create options with a specific filter
    pub fn with_filter(filter: SampleFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Set the opacity
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Use bilinear sampling
    pub fn bilinear(mut self) -> Self {
        self.filter = SampleFilter::Bilinear;
        self
    }
}

/// Destination rectangle touched by a transform, right and bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    /// First destination column written
    pub left: u32,
    /// First destination row written
    pub top: u32,
    /// One past the last column written
    pub right: u32,
    /// One past the last row written
    pub bottom: u32,
}

impl ClipRect {
    /// Columns in the rectangle, zero when empty.
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Rows in the rectangle.
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Whether no destination pixel is covered.
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
}

fn clamp_edge(v: f32, limit: u32) -> u32 {
    // NaN maps to 0 through the saturating cast
    (v as f64).clamp(0.0, limit as f64) as u32
}

/// Destination pixels a placement of a `src_width` x `src_height` source can
/// reach, or `None` if it misses the destination entirely.
pub fn clip_rect(
    placement: &AffineTransform2D,
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> Option<ClipRect> {
    if src_width == 0 || src_height == 0 {
        return None;
    }
    let (min, max) = placement.transform_bounds(src_width as f32, src_height as f32);
    let rect = ClipRect {
        left: clamp_edge(min.x.floor(), dst_width),
        top: clamp_edge(min.y.floor(), dst_height),
        right: clamp_edge(max.x.ceil(), dst_width),
        bottom: clamp_edge(max.y.ceil(), dst_height),
    };
    (!rect.is_empty()).then_some(rect)
}

fn check_opacity(opacity: f32) -> TransformResult<()> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(TransformError::InvalidOpacity(opacity));
    }
    Ok(())
}

struct TransformJob<'s, 'd, 'a, 'b> {
    src: &'s RasterView<'a>,
    dst: &'d mut RasterViewMut<'b>,
    inverse: AffineTransform2D,
    clip: ClipRect,
    strategy: TransferStrategy,
    filter: SampleFilter,
    factor: u32,
}

impl FormatPairVisitor for TransformJob<'_, '_, '_, '_> {
    type Output = TransformResult<()>;

    fn visit<S: PixelCodec, D: PixelCodec>(self) -> Self::Output {
        let sampler = QuantizedSampler::<S>::new(*self.src)?;
        let offset = match self.filter {
            SampleFilter::Nearest => 0.0,
            SampleFilter::Bilinear => 0.5,
        };
        let size = D::FORMAT.byte_size();
        let span = self.clip.left as usize * size..self.clip.right as usize * size;

        for y in self.clip.top..self.clip.bottom {
            let mut stepper =
                FixedPointRowStepper::new(&self.inverse, self.clip.left as i32, y as i32, offset);
            let row = &mut self.dst.row_mut(y)[span.clone()];
            match self.strategy {
                TransferStrategy::Direct => transfer::direct_row(&sampler, &mut stepper, row),
                TransferStrategy::Convert => {
                    transfer::convert_row::<S, D>(&sampler, &mut stepper, self.filter, row)
                }
                TransferStrategy::Compose => transfer::compose_row::<S, D>(
                    &sampler,
                    &mut stepper,
                    self.filter,
                    self.factor,
                    row,
                ),
            }
        }
        Ok(())
    }
}

/// Transform `src` into `dst` under `placement`
///
/// # Arguments
///
/// * `src` - Source raster, read only
/// * `dst` - Destination raster
/// * `placement` - Matrix mapping source coordinates to destination coordinates
/// * `opacity` - Source opacity in `0.0..=1.0`
/// * `use_bilinear` - Blend four neighbors instead of taking the nearest
///
/// # Errors
///
/// - [`TransformError::Core`] with an unsupported format pair
/// - [`TransformError::InvalidOpacity`] if `opacity` is outside `0.0..=1.0`
/// - [`TransformError::SingularMatrix`] if `placement` cannot be inverted
pub fn affine_transform(
    src: &RasterView<'_>,
    dst: &mut RasterViewMut<'_>,
    placement: &AffineTransform2D,
    opacity: f32,
    use_bilinear: bool,
) -> TransformResult<()> {
    let filter = if use_bilinear {
        SampleFilter::Bilinear
    } else {
        SampleFilter::Nearest
    };
    let options = TransformOptions::with_filter(filter).opacity(opacity);
    transform_with_options(src, dst, placement, &options)
}

/// Transform `src` into `dst` under `placement` with explicit options
///
/// See [`affine_transform`] for errors.
pub fn transform_with_options(
    src: &RasterView<'_>,
    dst: &mut RasterViewMut<'_>,
    placement: &AffineTransform2D,
    options: &TransformOptions,
) -> TransformResult<()> {
    let (src_format, dst_format) = (src.format(), dst.format());
    if !src_format.is_supported() || !dst_format.is_supported() {
        return Err(spanbitmap_core::Error::UnsupportedFormatPair {
            src: src_format,
            dst: dst_format,
        }
        .into());
    }
    check_opacity(options.opacity)?;
    let inverse = placement.inverse()?;

    if options.opacity == 0.0 {
        trace!("transparent source, nothing to draw");
        return Ok(());
    }
    let Some(clip) = clip_rect(placement, src.width(), src.height(), dst.width(), dst.height())
    else {
        trace!("source footprint misses the destination");
        return Ok(());
    };

    let strategy = TransferStrategy::select(src_format, dst_format, options.opacity, options.filter);
    debug!(
        %src_format,
        %dst_format,
        ?strategy,
        filter = ?options.filter,
        left = clip.left,
        top = clip.top,
        width = clip.width(),
        height = clip.height(),
        "affine transform"
    );

    let job = TransformJob {
        src,
        dst,
        inverse,
        clip,
        strategy,
        filter: options.filter,
        factor: opacity_factor(options.opacity),
    };
    visit_pair(src_format, dst_format, job)?
}

/// Draw `src` stretched onto the destination rectangle at (x, y) of size
/// `width` x `height`
///
/// # Errors
///
/// - [`TransformError::EmptyRaster`] if the source has no pixels
/// - [`TransformError::InvalidParameters`] if the rectangle is degenerate
/// - anything [`transform_with_options`] returns
pub fn draw_scaled(
    src: &RasterView<'_>,
    dst: &mut RasterViewMut<'_>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    options: &TransformOptions,
) -> TransformResult<()> {
    if src.width() == 0 || src.height() == 0 {
        return Err(TransformError::EmptyRaster {
            width: src.width(),
            height: src.height(),
        });
    }
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(width) || !valid(height) || !x.is_finite() || !y.is_finite() {
        return Err(TransformError::InvalidParameters(format!(
            "target rectangle {width}x{height} at ({x}, {y})"
        )));
    }
    let placement = AffineTransform2D::scale(width / src.width() as f32, height / src.height() as f32)
        .then(&AffineTransform2D::translation(x, y));
    transform_with_options(src, dst, &placement, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanbitmap_core::{Bgr24, Bgra32, Bitmap, Gray8, PixelFormat};

    fn gray(width: u32, height: u32) -> Bitmap {
        Bitmap::from_fn(width, height, |x, y| Gray8((y * width + x) as u8 * 10))
    }

    #[test]
    fn test_options() {
        let o = TransformOptions::default();
        assert_eq!((o.opacity, o.filter), (1.0, SampleFilter::Nearest));
        let o = TransformOptions::with_opacity(0.25).bilinear();
        assert_eq!((o.opacity, o.filter), (0.25, SampleFilter::Bilinear));
    }

    #[test]
    fn test_clip_rect() {
        let m = AffineTransform2D::translation(-2.5, 3.0);
        let clip = clip_rect(&m, 4, 4, 10, 5).unwrap();
        assert_eq!(
            clip,
            ClipRect {
                left: 0,
                top: 3,
                right: 2,
                bottom: 5
            }
        );
        assert_eq!((clip.width(), clip.height()), (2, 2));
        let inverted = ClipRect {
            left: 4,
            top: 0,
            right: 1,
            bottom: 1,
        };
        assert!(inverted.is_empty());
        assert_eq!(inverted.width(), 0);
        let away = AffineTransform2D::translation(100.0, 0.0);
        assert_eq!(clip_rect(&away, 4, 4, 10, 10), None);
        assert_eq!(clip_rect(&m, 0, 4, 10, 10), None);
    }

    #[test]
    fn test_identity_copy() {
        let src = gray(5, 3);
        let mut dst = Bitmap::new(5, 3, PixelFormat::GRAY8);
        affine_transform(
            &src.as_view(),
            &mut dst.as_view_mut(),
            &AffineTransform2D::identity(),
            1.0,
            false,
        )
        .unwrap();
        assert_eq!(src, dst);
    }

    #[test]
    fn test_translation_leaves_outside_untouched() {
        let src = gray(2, 2);
        let mut dst = Bitmap::new(4, 4, PixelFormat::GRAY8);
        dst.as_view_mut().fill_pixel(Gray8(255)).unwrap();
        let m = AffineTransform2D::translation(1.0, 2.0);
        affine_transform(&src.as_view(), &mut dst.as_view_mut(), &m, 1.0, false).unwrap();
        assert_eq!(
            dst.as_bytes(),
            &[
                255, 255, 255, 255, //
                255, 255, 255, 255, //
                255, 0, 10, 255, //
                255, 20, 30, 255,
            ]
        );
    }

    #[test]
    fn test_convert_format() {
        let src = Bitmap::from_fn(2, 1, |x, _| Bgr24 {
            b: x as u8,
            g: 1,
            r: 2,
        });
        let mut dst = Bitmap::new(2, 1, PixelFormat::BGRA32);
        transform_with_options(
            &src.as_view(),
            &mut dst.as_view_mut(),
            &AffineTransform2D::identity(),
            &TransformOptions::default(),
        )
        .unwrap();
        assert_eq!(dst.pixel::<Bgra32>(1, 0).unwrap(), Bgra32::new(2, 1, 1, 255));
    }

    #[test]
    fn test_errors() {
        let src = gray(2, 2);
        let mut dst = Bitmap::new(2, 2, PixelFormat::GRAY8);
        let id = AffineTransform2D::identity();
        let bad = [f32::NAN, -0.1, 1.5];
        for opacity in bad {
            let err = affine_transform(&src.as_view(), &mut dst.as_view_mut(), &id, opacity, false)
                .unwrap_err();
            assert!(matches!(err, TransformError::InvalidOpacity(_)));
        }
        let singular = AffineTransform2D::scale(0.0, 0.0);
        let err = affine_transform(&src.as_view(), &mut dst.as_view_mut(), &singular, 1.0, false)
            .unwrap_err();
        assert!(matches!(err, TransformError::SingularMatrix));
    }

    #[test]
    fn test_zero_opacity_is_noop() {
        let src = gray(2, 2);
        let mut dst = Bitmap::new(2, 2, PixelFormat::GRAY8);
        let id = AffineTransform2D::identity();
        affine_transform(&src.as_view(), &mut dst.as_view_mut(), &id, 0.0, true).unwrap();
        assert!(dst.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_draw_scaled() {
        let src = Bitmap::from_fn(1, 1, |_, _| Gray8(77));
        let mut dst = Bitmap::new(4, 4, PixelFormat::GRAY8);
        draw_scaled(
            &src.as_view(),
            &mut dst.as_view_mut(),
            1.0,
            1.0,
            2.0,
            2.0,
            &TransformOptions::default(),
        )
        .unwrap();
        let hits = dst.as_bytes().iter().filter(|&&b| b == 77).count();
        assert_eq!(hits, 4);
        assert_eq!(dst.pixel::<Gray8>(1, 1).unwrap(), Gray8(77));
        assert_eq!(dst.pixel::<Gray8>(3, 3).unwrap(), Gray8(0));

        let err = draw_scaled(
            &src.as_view(),
            &mut dst.as_view_mut(),
            0.0,
            0.0,
            0.0,
            2.0,
            &TransformOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::InvalidParameters(_)));
    }
}
