//! In-memory raster fixtures
//!
//! Regression tests build their inputs here instead of loading image files.

use crate::error::TestResult;
use spanbitmap_core::{Bgr24, Bgra32, Bitmap, Gray8, PixelFormat};

/// Horizontal-plus-vertical gray ramp: `(x * 64 + y * 16) mod 256`.
pub fn gradient_gray8(width: u32, height: u32) -> Bitmap {
    Bitmap::from_fn(width, height, |x, y| Gray8(((x * 64 + y * 16) % 256) as u8))
}

/// Color ramp with red following x and green following y.
///
/// Blue is fixed at 128 so channel-order mistakes show up in comparisons.
pub fn gradient_bgr24(width: u32, height: u32) -> Bitmap {
    Bitmap::from_fn(width, height, |x, y| Bgr24 {
        b: 128,
        g: ((y * 64) % 256) as u8,
        r: ((x * 64) % 256) as u8,
    })
}

/// Two-color checkerboard of `cell`-sized squares in any supported format.
pub fn checkerboard(
    width: u32,
    height: u32,
    cell: u32,
    format: PixelFormat,
) -> TestResult<Bitmap> {
    let cell = cell.max(1);
    let light = Bgra32::opaque(230, 230, 230);
    let dark = Bgra32::opaque(20, 40, 60);
    let board = Bitmap::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { light } else { dark }
    });
    convert_bitmap(&board, format)
}

/// Bitmap filled with one color.
pub fn solid(width: u32, height: u32, color: Bgra32, format: PixelFormat) -> TestResult<Bitmap> {
    let plain = Bitmap::from_fn(width, height, |_, _| color);
    convert_bitmap(&plain, format)
}

/// Straight-alpha BGRA whose alpha ramps from 0 on the left to 255 on the
/// right while color stays fixed.
pub fn translucent_bgra(width: u32, height: u32, color: Bgra32) -> Bitmap {
    let span = width.saturating_sub(1).max(1);
    Bitmap::from_fn(width, height, |x, _| Bgra32 {
        a: (x.min(span) * 255 / span) as u8,
        ..color
    })
}

fn convert_bitmap(src: &Bitmap, format: PixelFormat) -> TestResult<Bitmap> {
    if src.format() == format {
        return Ok(src.clone());
    }
    let mut out = Bitmap::new(src.width(), src.height(), format);
    spanbitmap_core::copy_converted(&src.as_view(), &mut out.as_view_mut())?;
    Ok(out)
}
