//! Pairwise pixel conversion registry
//!
//! Every (source, destination) pair of supported formats has a converter.
//! The pairs are not looked up by reflection: [`visit_pair`] expands a
//! two-level match over [`PixelFormat::ALL`] into a call of a generic
//! [`FormatPairVisitor::visit`] monomorphized for the concrete codec types,
//! so engines run their inner loops with both formats known at compile time.
//!
//! [`converter`] exposes the same matrix as plain function pointers, built
//! once into a [`ConverterTable`].

use crate::codec::{
    Argb32, Bgr24, Bgra32, Bgrp32, Gray8, PixelCodec, Rgb24, Rgb96F, Rgba32, Rgba128F, Rgbp32,
};
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::raster::{RasterView, RasterViewMut};
use std::marker::PhantomData;
use std::sync::OnceLock;

/// Convert one encoded pixel into another encoding.
pub type ConvertFn = fn(&[u8], &mut [u8]);

/// Convert a decoded pixel between codecs.
///
/// Float to float goes through [`Rgba128F`], premultiplied to premultiplied
/// through [`Bgrp32`], everything else through [`Bgra32`].
#[inline]
pub fn convert<S: PixelCodec, D: PixelCodec>(pixel: S) -> D {
    if S::FORMAT.is_float() && D::FORMAT.is_float() {
        D::from_rgba_f32(pixel.to_rgba_f32())
    } else if S::FORMAT.is_premultiplied() && D::FORMAT.is_premultiplied() {
        D::from_premul(pixel.to_premul())
    } else {
        D::from_bgra(pixel.to_bgra())
    }
}

/// Convert one encoded pixel.
#[inline]
pub fn convert_pixel<S: PixelCodec, D: PixelCodec>(src: &[u8], dst: &mut [u8]) {
    convert::<S, D>(S::read(src)).write(dst);
}

/// Convert a run of encoded pixels.
///
/// Converts `min(src, dst)` whole pixels.
pub fn convert_span<S: PixelCodec, D: PixelCodec>(src: &[u8], dst: &mut [u8]) {
    if S::FORMAT == D::FORMAT {
        let len = src.len().min(dst.len());
        dst[..len].copy_from_slice(&src[..len]);
        return;
    }
    let src_px = src.chunks_exact(S::FORMAT.byte_size());
    let dst_px = dst.chunks_exact_mut(D::FORMAT.byte_size());
    for (s, d) in src_px.zip(dst_px) {
        convert_pixel::<S, D>(s, d);
    }
}

// ============================================================================
// Visitors
// ============================================================================

/// A job generic over one pixel codec.
pub trait FormatVisitor {
    type Output;

    fn visit<P: PixelCodec>(self) -> Self::Output;
}

/// A job generic over a source and a destination pixel codec.
pub trait FormatPairVisitor {
    type Output;

    fn visit<S: PixelCodec, D: PixelCodec>(self) -> Self::Output;
}

/// Run `visitor` with the codec registered for `format`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if no codec is registered.
pub fn visit_format<V: FormatVisitor>(format: PixelFormat, visitor: V) -> Result<V::Output> {
    let output = match format {
        PixelFormat::GRAY8 => visitor.visit::<Gray8>(),
        PixelFormat::BGR24 => visitor.visit::<Bgr24>(),
        PixelFormat::RGB24 => visitor.visit::<Rgb24>(),
        PixelFormat::BGRA32 => visitor.visit::<Bgra32>(),
        PixelFormat::RGBA32 => visitor.visit::<Rgba32>(),
        PixelFormat::ARGB32 => visitor.visit::<Argb32>(),
        PixelFormat::BGRP32 => visitor.visit::<Bgrp32>(),
        PixelFormat::RGBP32 => visitor.visit::<Rgbp32>(),
        PixelFormat::RGB96F => visitor.visit::<Rgb96F>(),
        PixelFormat::RGBA128F => visitor.visit::<Rgba128F>(),
        _ => return Err(Error::UnsupportedFormat(format)),
    };
    Ok(output)
}

struct SourceStage<V> {
    dst: PixelFormat,
    visitor: V,
}

impl<V: FormatPairVisitor> FormatVisitor for SourceStage<V> {
    type Output = Result<V::Output>;

    fn visit<S: PixelCodec>(self) -> Self::Output {
        visit_format(
            self.dst,
            DestinationStage::<S, V> {
                visitor: self.visitor,
                _source: PhantomData,
            },
        )
    }
}

struct DestinationStage<S, V> {
    visitor: V,
    _source: PhantomData<S>,
}

impl<S: PixelCodec, V: FormatPairVisitor> FormatVisitor for DestinationStage<S, V> {
    type Output = V::Output;

    fn visit<D: PixelCodec>(self) -> V::Output {
        self.visitor.visit::<S, D>()
    }
}

/// Run `visitor` with the codecs registered for `src` and `dst`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormatPair`] if either format has no codec.
/// The check happens before the visitor runs.
pub fn visit_pair<V: FormatPairVisitor>(
    src: PixelFormat,
    dst: PixelFormat,
    visitor: V,
) -> Result<V::Output> {
    if !src.is_supported() || !dst.is_supported() {
        return Err(Error::UnsupportedFormatPair { src, dst });
    }
    visit_format(src, SourceStage { dst, visitor })
        .and_then(|inner| inner)
        .map_err(|_| Error::UnsupportedFormatPair { src, dst })
}

// ============================================================================
// Converter table
// ============================================================================

const FORMAT_COUNT: usize = PixelFormat::ALL.len();

/// Position of `format` in [`PixelFormat::ALL`].
pub fn format_index(format: PixelFormat) -> Option<usize> {
    PixelFormat::ALL.iter().position(|&f| f == format)
}

struct ConverterLookup;

impl FormatPairVisitor for ConverterLookup {
    type Output = ConvertFn;

    fn visit<S: PixelCodec, D: PixelCodec>(self) -> ConvertFn {
        convert_pixel::<S, D>
    }
}

/// Matrix of converters for every supported format pair
pub struct ConverterTable {
    entries: Vec<ConvertFn>,
}

impl ConverterTable {
    /// Build the full matrix.
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(FORMAT_COUNT * FORMAT_COUNT);
        for src in PixelFormat::ALL {
            for dst in PixelFormat::ALL {
                // every listed format has a codec, so the lookup cannot fail
                if let Ok(f) = visit_pair(src, dst, ConverterLookup) {
                    entries.push(f);
                }
            }
        }
        debug_assert_eq!(entries.len(), FORMAT_COUNT * FORMAT_COUNT);
        Self { entries }
    }

    /// Converter for a pair, or `None` if either format is unsupported.
    pub fn get(&self, src: PixelFormat, dst: PixelFormat) -> Option<ConvertFn> {
        let i = format_index(src)?;
        let j = format_index(dst)?;
        self.entries.get(i * FORMAT_COUNT + j).copied()
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ConverterTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared converter table, built on first use.
pub fn converter_table() -> &'static ConverterTable {
    static TABLE: OnceLock<ConverterTable> = OnceLock::new();
    TABLE.get_or_init(ConverterTable::new)
}

/// Look up the converter for a format pair.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormatPair`] if no converter is registered.
pub fn converter(src: PixelFormat, dst: PixelFormat) -> Result<ConvertFn> {
    converter_table()
        .get(src, dst)
        .ok_or(Error::UnsupportedFormatPair { src, dst })
}

// ============================================================================
// Whole-raster copy
// ============================================================================

struct CopyConverted<'s, 'd, 'a, 'b> {
    src: &'s RasterView<'a>,
    dst: &'d mut RasterViewMut<'b>,
}

impl FormatPairVisitor for CopyConverted<'_, '_, '_, '_> {
    type Output = ();

    fn visit<S: PixelCodec, D: PixelCodec>(self) {
        for y in 0..self.src.height() {
            convert_span::<S, D>(self.src.row(y), self.dst.row_mut(y));
        }
    }
}

/// Copy `src` into `dst` pixel for pixel, converting the format.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the rasters differ in size
/// - [`Error::UnsupportedFormatPair`] if no converter is registered
pub fn copy_converted(src: &RasterView<'_>, dst: &mut RasterViewMut<'_>) -> Result<()> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(Error::DimensionMismatch {
            expected: (dst.width(), dst.height()),
            actual: (src.width(), src.height()),
        });
    }
    visit_pair(src.format(), dst.format(), CopyConverted { src, dst })
}
