//! spanbitmap-core - Pixel formats and raster views
//!
//! This crate provides the data model shared by the spanbitmap engines:
//!
//! - [`PixelFormat`] - value description of a pixel's memory encoding
//! - [`PixelCodec`] and the per-format pixel types ([`Bgra32`], [`Bgrp32`], ...)
//! - [`visit_pair`] / [`converter`] - the pairwise conversion registry
//! - [`RasterView`] / [`RasterViewMut`] - non-owning views over pixel memory
//! - [`Bitmap`] - an owned buffer that hands out views

pub mod bitmap;
pub mod codec;
pub mod convert;
pub mod error;
pub mod format;
pub mod raster;

pub use bitmap::Bitmap;
pub use codec::{
    Argb32, Bgr24, Bgra32, Bgrp32, Gray8, LERP_ONE, LERP_SHIFT, PixelCodec, Rgb24, Rgb96F, Rgba32,
    Rgba128F, Rgbp32,
};
pub use convert::{
    ConvertFn, ConverterTable, FormatPairVisitor, FormatVisitor, convert, convert_pixel,
    convert_span, converter, converter_table, copy_converted, visit_format, visit_pair,
};
pub use error::{Error, Result};
pub use format::{ChannelLayout, ChannelType, PixelFormat};
pub use raster::{RasterInfo, RasterView, RasterViewMut};
