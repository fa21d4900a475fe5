//! Resize regression test
//!
//! Tests the separable bilinear resize:
//!   1. Equal sizes reduce to a per-pixel conversion
//!   2. Resizing one axis follows the axis table computed alone
//!   3. Exact 2x shrink pairs disjoint source pixels
//!   4. Constant images stay constant at any size and format
//!   5. Fit helpers keep the aspect ratio

use proptest::prelude::*;
use spanbitmap_core::{Bgra32, Bitmap, Gray8, PixelFormat, RasterInfo, RasterViewMut, copy_converted};
use spanbitmap_test::{RegParams, checkerboard, gradient_bgr24, solid};
use spanbitmap_transform::{
    ResizeScratch, build_axis_table, fit_dimensions, resize, resize_to_fit, resize_with_scratch,
};

#[test]
fn resize_reg_identity() {
    let mut rp = RegParams::new("resize_identity");

    let src = gradient_bgr24(7, 5);
    for format in PixelFormat::ALL {
        let mut resized = Bitmap::new(7, 5, format);
        resize(&src.as_view(), &mut resized.as_view_mut()).expect("resize");
        let mut converted = Bitmap::new(7, 5, format);
        copy_converted(&src.as_view(), &mut converted.as_view_mut()).expect("convert");
        rp.compare_bytes(converted.as_bytes(), resized.as_bytes());
    }

    assert!(rp.cleanup(), "resize identity regression test failed");
}

#[test]
fn resize_reg_width_only() {
    let mut rp = RegParams::new("resize_width_only");

    let values = [10u8, 90, 30, 250, 0, 140];
    let src = Bitmap::from_fn(6, 3, |x, y| Gray8(values[x as usize] / (y as u8 + 1)));
    let mut dst = Bitmap::new(4, 3, PixelFormat::GRAY8);
    resize(&src.as_view(), &mut dst.as_view_mut()).expect("resize");

    let table = build_axis_table(6, 4);
    for y in 0..3 {
        for (x, pair) in table.iter().enumerate() {
            let l = src.pixel::<Gray8>(pair.left, y).expect("left").0 as f64;
            let r = src.pixel::<Gray8>(pair.right, y).expect("right").0 as f64;
            let want = l + (r - l) * pair.amount as f64;
            let got = dst.pixel::<Gray8>(x as u32, y).expect("dst").0 as f64;
            rp.compare_values(want, got, 1.0);
        }
    }

    assert!(rp.cleanup(), "resize width-only regression test failed");
}

#[test]
fn resize_reg_halving_table() {
    let mut rp = RegParams::new("resize_halving");

    // overlap weighting: each output pairs two whole source pixels at 0.5
    let table = build_axis_table(4, 2);
    rp.compare_values(2.0, table.len() as f64, 0.0);
    let mut used = Vec::new();
    for pair in &table {
        rp.compare_values(0.5, pair.amount as f64, 0.0);
        rp.compare_values(1.0, (pair.right - pair.left) as f64, 0.0);
        used.push(pair.left);
        used.push(pair.right);
    }
    rp.compare_bytes(&[0, 1, 2, 3], &used.iter().map(|&i| i as u8).collect::<Vec<_>>());

    // two-pixel blocks shrink to their mean
    let src = Bitmap::from_fn(4, 2, |x, _| Gray8([40, 60, 200, 100][x as usize]));
    let mut dst = Bitmap::new(2, 2, PixelFormat::GRAY8);
    resize(&src.as_view(), &mut dst.as_view_mut()).expect("resize");
    rp.compare_bytes(&[50, 150, 50, 150], dst.as_bytes());

    assert!(rp.cleanup(), "resize halving regression test failed");
}

#[test]
fn resize_reg_constant() {
    let mut rp = RegParams::new("resize_constant");

    let color = Bgra32::opaque(17, 130, 240);
    let sizes = [(1, 1), (3, 9), (13, 2), (40, 40)];
    for format in [PixelFormat::BGR24, PixelFormat::RGBA32, PixelFormat::BGRP32, PixelFormat::RGB96F] {
        let src = solid(9, 6, color, format).expect("solid");
        for (w, h) in sizes {
            let mut dst = Bitmap::new(w, h, PixelFormat::BGRA32);
            resize(&src.as_view(), &mut dst.as_view_mut()).expect("resize");
            let expected = solid(w, h, color, PixelFormat::BGRA32).expect("expected");
            rp.compare_raster(&expected.as_view(), &dst.as_view());
        }
    }

    assert!(rp.cleanup(), "resize constant regression test failed");
}

#[test]
fn resize_reg_strided_destination() {
    let mut rp = RegParams::new("resize_strided");

    let src = checkerboard(8, 8, 4, PixelFormat::BGR24).expect("board");
    let mut plain = Bitmap::new(4, 4, PixelFormat::BGR24);
    resize(&src.as_view(), &mut plain.as_view_mut()).expect("plain");

    let info = RasterInfo::with_stride(4, 4, 16, PixelFormat::BGR24).expect("stride");
    let mut buf = vec![0x55u8; 16 * 4];
    let mut padded = RasterViewMut::new(info, &mut buf).expect("view");
    let mut scratch = ResizeScratch::new();
    resize_with_scratch(&src.as_view(), &mut padded, &mut scratch).expect("padded");
    rp.compare_raster(&plain.as_view(), &padded.as_view());
    rp.compare_bytes(&[0x55; 4], &buf[12..16]);

    assert!(rp.cleanup(), "resize strided regression test failed");
}

#[test]
fn resize_reg_fit() {
    let mut rp = RegParams::new("resize_fit");

    let (w, h) = fit_dimensions(640, 480, 320, 320);
    rp.compare_values(320.0, w as f64, 0.0);
    rp.compare_values(240.0, h as f64, 0.0);

    let src = gradient_bgr24(30, 10);
    let out = resize_to_fit(&src.as_view(), 9, 9, PixelFormat::RGBA32).expect("fit");
    rp.compare_values(9.0, out.width() as f64, 0.0);
    rp.compare_values(3.0, out.height() as f64, 0.0);
    rp.compare_values(1.0, (out.format() == PixelFormat::RGBA32) as u8 as f64, 0.0);

    let err = resize_to_fit(&src.as_view(), 0, 9, PixelFormat::RGBA32);
    rp.compare_values(1.0, err.is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "resize fit regression test failed");
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_axis_table_is_well_formed(src_len in 1u32..=300, dst_len in 1u32..=300) {
        let table = build_axis_table(src_len, dst_len);
        prop_assert_eq!(table.len(), dst_len as usize);
        let mut previous = 0;
        for pair in &table {
            prop_assert!(pair.left <= pair.right);
            prop_assert!(pair.right < src_len);
            prop_assert!(pair.right - pair.left <= 1);
            prop_assert!((0.0..=1.0).contains(&pair.amount));
            // sample positions never move backwards
            prop_assert!(pair.left >= previous);
            previous = pair.left;
        }
    }

    #[test]
    fn prop_fit_stays_inside(
        src_w in 1u32..=2000,
        src_h in 1u32..=2000,
        max_w in 1u32..=500,
        max_h in 1u32..=500,
    ) {
        let (w, h) = fit_dimensions(src_w, src_h, max_w, max_h);
        prop_assert!(w >= 1 && h >= 1);
        prop_assert!(w <= max_w && h <= max_h);
        prop_assert!(w == max_w || h == max_h);
    }
}
