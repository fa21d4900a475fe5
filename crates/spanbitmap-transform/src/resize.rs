//! Separable bilinear resize
//!
//! Each axis gets a table mapping every destination index to a pair of
//! source indices and a blend amount ([`build_axis_table`]). A resize walks
//! the destination rows: the two source rows named by the row table are
//! converted to float RGB, resampled horizontally with the column table and
//! kept in a two-slot cache, then blended vertically into the destination.
//! Consecutive destination rows that share source rows reuse the cached
//! resampled rows.
//!
//! Tables and row buffers live in a caller-owned [`ResizeScratch`]; keep one
//! per thread to avoid reallocating across calls. [`resize`] uses a
//! throwaway scratch.
//!
//! Alpha is not carried: destination pixels are written opaque.

use spanbitmap_core::{
    Bitmap, FormatPairVisitor, PixelCodec, PixelFormat, RasterView, RasterViewMut, Rgba128F,
    copy_converted, visit_pair,
};
use tracing::debug;

use crate::error::{TransformError, TransformResult};

// Guards interval edges against float noise in the ratio
const EDGE_EPSILON: f64 = 1e-9;

/// Two source indices and the weight of the right one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePair {
    pub left: u32,
    pub right: u32,
    /// Weight of `right`, in `0.0..=1.0`
    pub amount: f32,
}

impl SamplePair {
    fn single(index: u32) -> Self {
        Self {
            left: index,
            right: index,
            amount: 0.0,
        }
    }

    fn weighted(left: u32, right: u32, left_weight: f64, right_weight: f64) -> Self {
        let total = left_weight + right_weight;
        let amount = if total > 0.0 { right_weight / total } else { 0.0 };
        Self {
            left,
            right,
            amount: amount as f32,
        }
    }
}

fn expand_pair(i: u32, ratio: f64, last: u32) -> SamplePair {
    let point = (i as f64 + 0.5) * ratio - 0.5;
    if point <= 0.0 {
        return SamplePair::single(0);
    }
    if point >= last as f64 {
        return SamplePair::single(last);
    }
    let left = point.floor() as u32;
    SamplePair {
        left,
        right: left + 1,
        amount: (point - left as f64) as f32,
    }
}

fn shrink_pair(i: u32, ratio: f64, last: u32) -> SamplePair {
    let start = i as f64 * ratio;
    let end = (i + 1) as f64 * ratio;
    let lo = ((start + EDGE_EPSILON).floor() as u32).min(last);
    let hi = (((end - EDGE_EPSILON).ceil() as u32).saturating_sub(1)).clamp(lo, last);
    // coverage of the partially covered end pixels
    let head = (lo + 1) as f64 - start;
    let tail = end - hi as f64;

    match hi - lo + 1 {
        1 => SamplePair::single(lo),
        2 => SamplePair::weighted(lo, hi, head, tail),
        3 => {
            if head >= tail {
                SamplePair::weighted(lo, lo + 1, head, 1.0)
            } else {
                SamplePair::weighted(lo + 1, hi, 1.0, tail)
            }
        }
        count => {
            // 2-tap approximation of the box filter over the interior
            let left = lo + (count - 1) / 2;
            SamplePair {
                left,
                right: left + 1,
                amount: 0.5,
            }
        }
    }
}

/// Build the sample table for one axis
///
/// Returns `dst_len` entries. Both lengths must be non-zero; an empty table
/// is returned otherwise.
///
/// - equal lengths: identity pairs
/// - expanding: pixel-center sampling between the two straddling sources,
///   clamped at the edges
/// - shrinking: overlap-weighted pair for intervals of up to three source
///   pixels, the two interior pixels at equal weight beyond that
pub fn build_axis_table(src_len: u32, dst_len: u32) -> Vec<SamplePair> {
    if src_len == 0 || dst_len == 0 {
        return Vec::new();
    }
    let last = src_len - 1;
    let ratio = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|i| {
            if src_len == dst_len {
                SamplePair::single(i)
            } else if src_len < dst_len {
                expand_pair(i, ratio, last)
            } else {
                shrink_pair(i, ratio, last)
            }
        })
        .collect()
}

// ============================================================================
// Scratch
// ============================================================================

#[derive(Debug, Default)]
struct AxisCache {
    key: Option<(u32, u32)>,
    table: Vec<SamplePair>,
}

impl AxisCache {
    fn get(&mut self, src_len: u32, dst_len: u32) -> &[SamplePair] {
        if self.key != Some((src_len, dst_len)) {
            self.table = build_axis_table(src_len, dst_len);
            self.key = Some((src_len, dst_len));
        }
        &self.table
    }
}

#[derive(Debug, Default)]
struct RowSlot {
    source_row: Option<u32>,
    pixels: Vec<[f32; 3]>,
}

/// Reusable buffers for [`resize_with_scratch`]
///
/// Holds the most recent column and row tables and the intermediate row
/// buffers. Contents are rebuilt whenever sizes change, so a scratch can be
/// shared across unrelated resizes on the same thread.
#[derive(Debug, Default)]
pub struct ResizeScratch {
    columns: AxisCache,
    rows: AxisCache,
    line: Vec<[f32; 3]>,
    slots: [RowSlot; 2],
}

impl ResizeScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all cached tables and buffers.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Engine
// ============================================================================

#[inline]
fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Convert source row `y` to float and resample it into a slot, unless a
/// slot already holds it. `keep` is the other row needed for the current
/// destination row and is never evicted.
fn load_row<S: PixelCodec>(
    src: &RasterView<'_>,
    y: u32,
    keep: u32,
    columns: &[SamplePair],
    line: &mut Vec<[f32; 3]>,
    slots: &mut [RowSlot; 2],
) -> usize {
    if let Some(i) = slots.iter().position(|s| s.source_row == Some(y)) {
        return i;
    }
    let i = usize::from(slots[0].source_row == Some(keep));

    line.clear();
    line.extend(
        src.row(y)
            .chunks_exact(S::FORMAT.byte_size())
            .map(|px| {
                let c = S::read(px).to_rgba_f32();
                [c.r, c.g, c.b]
            }),
    );

    let slot = &mut slots[i];
    slot.pixels.clear();
    slot.pixels
        .extend(columns.iter().map(|p| mix(line[p.left as usize], line[p.right as usize], p.amount)));
    slot.source_row = Some(y);
    i
}

struct ResizeJob<'s, 'd, 'x, 'a, 'b> {
    src: &'s RasterView<'a>,
    dst: &'d mut RasterViewMut<'b>,
    scratch: &'x mut ResizeScratch,
}

impl FormatPairVisitor for ResizeJob<'_, '_, '_, '_, '_> {
    type Output = ();

    fn visit<S: PixelCodec, D: PixelCodec>(self) {
        let ResizeScratch {
            columns,
            rows,
            line,
            slots,
        } = self.scratch;
        let columns = columns.get(self.src.width(), self.dst.width());
        let rows = rows.get(self.src.height(), self.dst.height());
        for slot in slots.iter_mut() {
            slot.source_row = None;
        }

        let size = D::FORMAT.byte_size();
        for (y, pair) in rows.iter().enumerate() {
            let upper = load_row::<S>(self.src, pair.left, pair.right, columns, line, slots);
            let lower = load_row::<S>(self.src, pair.right, pair.left, columns, line, slots);
            let (upper, lower) = (&slots[upper].pixels, &slots[lower].pixels);

            let out = self.dst.row_mut(y as u32).chunks_exact_mut(size);
            for ((dst, &u), &l) in out.zip(upper).zip(lower) {
                let [r, g, b] = mix(u, l, pair.amount);
                D::from_rgba_f32(Rgba128F::new(r, g, b, 1.0)).write(dst);
            }
        }
    }
}

fn check_not_empty(width: u32, height: u32) -> TransformResult<()> {
    if width == 0 || height == 0 {
        return Err(TransformError::EmptyRaster { width, height });
    }
    Ok(())
}

/// Resize `src` into `dst` with separable bilinear sampling
///
/// Source and destination may differ in size on both axes and in format.
/// Equal sizes reduce to a per-pixel conversion.
///
/// # Errors
///
/// - [`TransformError::EmptyRaster`] if either raster has no pixels
/// - [`TransformError::Core`] with an unsupported format pair
pub fn resize(src: &RasterView<'_>, dst: &mut RasterViewMut<'_>) -> TransformResult<()> {
    resize_with_scratch(src, dst, &mut ResizeScratch::default())
}

/// [`resize`] reusing the tables and buffers in `scratch`
pub fn resize_with_scratch(
    src: &RasterView<'_>,
    dst: &mut RasterViewMut<'_>,
    scratch: &mut ResizeScratch,
) -> TransformResult<()> {
    check_not_empty(src.width(), src.height())?;
    check_not_empty(dst.width(), dst.height())?;

    if src.width() == dst.width() && src.height() == dst.height() {
        copy_converted(src, dst)?;
        return Ok(());
    }

    debug!(
        src_format = %src.format(),
        dst_format = %dst.format(),
        src_width = src.width(),
        src_height = src.height(),
        dst_width = dst.width(),
        dst_height = dst.height(),
        "bilinear resize"
    );
    let (src_format, dst_format) = (src.format(), dst.format());
    let job = ResizeJob { src, dst, scratch };
    visit_pair(src_format, dst_format, job)?;
    Ok(())
}

/// Largest size with the source aspect ratio that fits inside
/// `max_width` x `max_height`
///
/// Never returns a zero dimension for a non-empty source.
pub fn fit_dimensions(src_width: u32, src_height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if src_width == 0 || src_height == 0 {
        return (0, 0);
    }
    let src_ratio = src_width as f64 / src_height as f64;
    let max_ratio = max_width as f64 / max_height.max(1) as f64;
    let (w, h) = if src_ratio > max_ratio {
        // wider than the box, fit to width
        let scale = max_width as f64 / src_width as f64;
        (max_width, (src_height as f64 * scale).round() as u32)
    } else {
        let scale = max_height as f64 / src_height as f64;
        ((src_width as f64 * scale).round() as u32, max_height)
    };
    (w.max(1), h.max(1))
}

/// Resize `src` to fit inside `max_width` x `max_height` into a new bitmap
/// of `format`
///
/// # Errors
///
/// - [`TransformError::EmptyRaster`] if the source or the box is empty
/// - anything [`resize`] returns
pub fn resize_to_fit(
    src: &RasterView<'_>,
    max_width: u32,
    max_height: u32,
    format: PixelFormat,
) -> TransformResult<Bitmap> {
    check_not_empty(src.width(), src.height())?;
    check_not_empty(max_width, max_height)?;
    let (width, height) = fit_dimensions(src.width(), src.height(), max_width, max_height);
    let mut out = Bitmap::new(width, height, format);
    resize(src, &mut out.as_view_mut())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanbitmap_core::{Gray8, Rgb96F};

    fn pair(left: u32, right: u32, amount: f32) -> SamplePair {
        SamplePair {
            left,
            right,
            amount,
        }
    }

    #[test]
    fn test_identity_table() {
        let t = build_axis_table(3, 3);
        assert_eq!(t, vec![pair(0, 0, 0.0), pair(1, 1, 0.0), pair(2, 2, 0.0)]);
        assert!(build_axis_table(0, 3).is_empty());
    }

    #[test]
    fn test_expand_table() {
        // 2 -> 4: sample points -0.25, 0.25, 0.75, 1.25
        let t = build_axis_table(2, 4);
        assert_eq!(
            t,
            vec![
                pair(0, 0, 0.0),
                pair(0, 1, 0.25),
                pair(0, 1, 0.75),
                pair(1, 1, 0.0)
            ]
        );
    }

    #[test]
    fn test_exact_halving() {
        // each output covers two whole source pixels with equal overlap
        let t = build_axis_table(4, 2);
        assert_eq!(t, vec![pair(0, 1, 0.5), pair(2, 3, 0.5)]);
    }

    #[test]
    fn test_shrink_partial_overlap() {
        // 3 -> 2: intervals [0, 1.5) and [1.5, 3)
        let t = build_axis_table(3, 2);
        assert_eq!(t[0], pair(0, 1, 1.0 / 3.0));
        assert_eq!(t[1], pair(1, 2, 2.0 / 3.0));
    }

    #[test]
    fn test_shrink_three_pixel_span() {
        // 5 -> 2: [0, 2.5) covers 0, 1 fully and 2 by half
        let t = build_axis_table(5, 2);
        assert_eq!(t[0], pair(0, 1, 0.5));
        // [2.5, 5) covers 2 by half, 3 and 4 fully
        assert_eq!(t[1], pair(3, 4, 0.5));
    }

    #[test]
    fn test_heavy_shrink_uses_interior() {
        let t = build_axis_table(8, 2);
        assert_eq!(t, vec![pair(1, 2, 0.5), pair(5, 6, 0.5)]);
        let t = build_axis_table(100, 3);
        for p in &t {
            assert!(p.right == p.left + 1 && p.right < 100);
        }
    }

    #[test]
    fn test_fit_dimensions() {
        assert_eq!(fit_dimensions(400, 200, 100, 100), (100, 50));
        assert_eq!(fit_dimensions(200, 400, 100, 100), (50, 100));
        assert_eq!(fit_dimensions(10, 10, 40, 20), (20, 20));
        assert_eq!(fit_dimensions(1000, 1, 10, 10), (10, 1));
    }

    #[test]
    fn test_resize_gray_up() {
        let src = Bitmap::from_fn(2, 1, |x, _| Gray8(if x == 0 { 0 } else { 200 }));
        let mut dst = Bitmap::new(4, 1, PixelFormat::GRAY8);
        resize(&src.as_view(), &mut dst.as_view_mut()).unwrap();
        assert_eq!(dst.as_bytes(), &[0, 50, 150, 200]);
    }

    #[test]
    fn test_resize_shrink_averages() {
        let src = Bitmap::from_fn(4, 4, |x, _| Gray8(if x % 2 == 0 { 0 } else { 100 }));
        let mut dst = Bitmap::new(2, 2, PixelFormat::GRAY8);
        resize(&src.as_view(), &mut dst.as_view_mut()).unwrap();
        assert!(dst.as_bytes().iter().all(|&b| b == 50));
    }

    #[test]
    fn test_scratch_reuse() {
        let mut scratch = ResizeScratch::new();
        let a = Bitmap::from_fn(3, 3, |x, y| Gray8((x * 40 + y * 20) as u8));
        let b = Bitmap::from_fn(3, 3, |x, y| Gray8((200 - x * 40 - y * 20) as u8));
        let mut first = Bitmap::new(5, 7, PixelFormat::GRAY8);
        let mut second = Bitmap::new(5, 7, PixelFormat::GRAY8);
        resize_with_scratch(&a.as_view(), &mut first.as_view_mut(), &mut scratch).unwrap();
        resize_with_scratch(&b.as_view(), &mut second.as_view_mut(), &mut scratch).unwrap();

        let mut fresh = Bitmap::new(5, 7, PixelFormat::GRAY8);
        resize(&b.as_view(), &mut fresh.as_view_mut()).unwrap();
        assert_eq!(second, fresh);
        scratch.clear();
    }

    #[test]
    fn test_resize_errors() {
        let src = Bitmap::new(0, 3, PixelFormat::GRAY8);
        let mut dst = Bitmap::new(2, 2, PixelFormat::GRAY8);
        let err = resize(&src.as_view(), &mut dst.as_view_mut()).unwrap_err();
        assert!(matches!(err, TransformError::EmptyRaster { width: 0, height: 3 }));
    }

    #[test]
    fn test_resize_to_fit() {
        let src = Bitmap::from_fn(8, 4, |_, _| Gray8(128));
        let out = resize_to_fit(&src.as_view(), 4, 4, PixelFormat::RGB96F).unwrap();
        assert_eq!((out.width(), out.height()), (4, 2));
        let px = out.pixel::<Rgb96F>(3, 1).unwrap();
        assert!((px.r - 128.0 / 255.0).abs() < 1e-6);
    }
}
