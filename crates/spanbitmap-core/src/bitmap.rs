//! Owned pixel buffers
//!
//! [`Bitmap`] owns a byte buffer and hands out [`RasterView`] /
//! [`RasterViewMut`] views over it. The engines themselves only ever see
//! views; a `Bitmap` is a convenience for callers that need to allocate a
//! destination.

use crate::codec::PixelCodec;
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::raster::{RasterInfo, RasterView, RasterViewMut};

/// Owned raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    info: RasterInfo,
    data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a zero-filled continuous bitmap.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let info = RasterInfo::new(width, height, format);
        Self {
            data: vec![0; info.required_len()],
            info,
        }
    }

    /// Allocate a zero-filled bitmap with an explicit row stride.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStride`](crate::Error::InvalidStride) if the
    /// stride is shorter than a row, and
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if the
    /// buffer size overflows.
    pub fn with_stride(width: u32, height: u32, stride: usize, format: PixelFormat) -> Result<Self> {
        let info = RasterInfo::with_stride(width, height, stride, format)?;
        let len = stride.checked_mul(height as usize).ok_or_else(|| {
            Error::InvalidParameter(format!("bitmap {width}x{height} with stride {stride} is too large"))
        })?;
        Ok(Self {
            data: vec![0; len],
            info,
        })
    }

    /// Take ownership of continuous pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`](crate::Error::BufferTooSmall) if
    /// `data` is too short.
    pub fn from_bytes(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let info = RasterInfo::new(width, height, format);
        RasterView::new(info, &data)?;
        Ok(Self { info, data })
    }

    /// Build a bitmap of codec `P` by evaluating `f` at every pixel.
    pub fn from_fn<P, F>(width: u32, height: u32, mut f: F) -> Self
    where
        P: PixelCodec,
        F: FnMut(u32, u32) -> P,
    {
        let mut bitmap = Self::new(width, height, P::FORMAT);
        let size = P::FORMAT.byte_size();
        let stride = bitmap.info.stride();
        for y in 0..height {
            let row = &mut bitmap.data[y as usize * stride..][..width as usize * size];
            for (x, px) in row.chunks_exact_mut(size).enumerate() {
                f(x as u32, y).write(px);
            }
        }
        bitmap
    }

    pub fn info(&self) -> RasterInfo {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width()
    }

    pub fn height(&self) -> u32 {
        self.info.height()
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_view(&self) -> RasterView<'_> {
        RasterView::from_parts(self.info, &self.data)
    }

    pub fn as_view_mut(&mut self) -> RasterViewMut<'_> {
        RasterViewMut::from_parts(self.info, &mut self.data)
    }

    /// Decode the pixel at (x, y).
    pub fn pixel<P: PixelCodec>(&self, x: u32, y: u32) -> Result<P> {
        self.as_view().pixel(x, y)
    }

    /// Encode `value` at (x, y).
    pub fn set_pixel<P: PixelCodec>(&mut self, x: u32, y: u32, value: P) -> Result<()> {
        self.as_view_mut().set_pixel(x, y, value)
    }
}
