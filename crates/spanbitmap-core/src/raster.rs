//! Raster views
//!
//! [`RasterView`] and [`RasterViewMut`] describe a rectangle of pixels inside
//! a caller-supplied byte buffer: width, height, row stride and pixel format.
//! They never own memory. The engines read sources through a `RasterView`
//! and only ever write through a `RasterViewMut`.
//!
//! # Row layout
//!
//! Row `y` starts at byte `y * stride` and holds `width * byte_size` bytes of
//! pixels. Bytes between the end of a row and the next stride are padding
//! and are never read or written. A raster is *continuous* when the stride
//! has no padding.

use crate::codec::PixelCodec;
use crate::error::{Error, Result};
use crate::format::PixelFormat;

fn overflow(width: u32, height: u32, stride: usize) -> Error {
    Error::InvalidParameter(format!(
        "raster {width}x{height} with stride {stride} does not fit in memory"
    ))
}

/// Geometry and format of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterInfo {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl RasterInfo {
    /// Describe a continuous raster.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            stride: (width as usize).saturating_mul(format.byte_size()),
            format,
        }
    }

    /// Describe a raster with an explicit row stride in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStride`] if `stride < width * byte_size`, and
    /// [`Error::InvalidParameter`] if the raster size overflows `usize`.
    pub fn with_stride(width: u32, height: u32, stride: usize, format: PixelFormat) -> Result<Self> {
        let min = (width as usize)
            .checked_mul(format.byte_size())
            .ok_or_else(|| overflow(width, height, stride))?;
        if stride < min {
            return Err(Error::InvalidStride { stride, min });
        }
        let info = Self {
            width,
            height,
            stride,
            format,
        };
        info.checked_len()?;
        Ok(info)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel.
    pub fn pixel_size(&self) -> usize {
        self.format.byte_size()
    }

    /// Bytes of pixel data in one row, padding excluded.
    pub fn row_len(&self) -> usize {
        (self.width as usize).saturating_mul(self.format.byte_size())
    }

    /// Whether rows follow each other without padding.
    pub fn is_continuous(&self) -> bool {
        self.stride == self.row_len()
    }

    /// Whether the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest buffer length that holds every row.
    ///
    /// Saturates at `usize::MAX` for rasters no buffer can hold.
    pub fn required_len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// [`required_len`](Self::required_len), failing on overflow.
    pub fn checked_len(&self) -> Result<usize> {
        if self.height == 0 {
            return Ok(0);
        }
        (self.width as usize)
            .checked_mul(self.format.byte_size())
            .and_then(|row| {
                self.stride
                    .checked_mul(self.height as usize - 1)?
                    .checked_add(row)
            })
            .ok_or_else(|| overflow(self.width, self.height, self.stride))
    }

    /// Whether (x, y) lies inside the raster.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn check_buffer(&self, len: usize) -> Result<()> {
        let required = self.checked_len()?;
        if len < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: len,
            });
        }
        Ok(())
    }

    fn check_point(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width as usize,
            });
        }
        if y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height as usize,
            });
        }
        Ok(())
    }

    fn check_format<P: PixelCodec>(&self) -> Result<()> {
        if P::FORMAT != self.format {
            return Err(Error::FormatMismatch {
                expected: self.format,
                actual: P::FORMAT,
            });
        }
        Ok(())
    }

    /// Byte offset and geometry of a sub-rectangle.
    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<(usize, RasterInfo)> {
        let fits = x.checked_add(width).is_some_and(|r| r <= self.width)
            && y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits {
            return Err(Error::InvalidParameter(format!(
                "crop {width}x{height} at ({x}, {y}) exceeds {}x{}",
                self.width, self.height
            )));
        }
        let info = RasterInfo {
            width,
            height,
            stride: self.stride,
            format: self.format,
        };
        if info.is_empty() {
            return Ok((0, RasterInfo { height: 0, ..info }));
        }
        let offset = y as usize * self.stride + x as usize * self.pixel_size();
        Ok((offset, info))
    }
}

// ============================================================================
// Read-only view
// ============================================================================

/// Read-only view over pixel memory
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    info: RasterInfo,
    data: &'a [u8],
}

impl<'a> RasterView<'a> {
    /// Wrap `data` described by `info`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `data` cannot hold every row.
    pub fn new(info: RasterInfo, data: &'a [u8]) -> Result<Self> {
        info.check_buffer(data.len())?;
        Ok(Self { info, data })
    }

    /// Wrap a buffer already sized for `info`.
    pub(crate) fn from_parts(info: RasterInfo, data: &'a [u8]) -> Self {
        debug_assert!(data.len() >= info.required_len());
        Self { info, data }
    }

    /// Wrap a continuous buffer.
    pub fn from_continuous(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Result<Self> {
        Self::new(RasterInfo::new(width, height, format), data)
    }

    pub fn info(&self) -> RasterInfo {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn stride(&self) -> usize {
        self.info.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format
    }

    pub fn is_continuous(&self) -> bool {
        self.info.is_continuous()
    }

    /// Underlying bytes, padding included.
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.data[..self.info.required_len()]
    }

    /// Pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        assert!(y < self.info.height, "row {y} out of range");
        let start = y as usize * self.info.stride;
        &self.data[start..start + self.info.row_len()]
    }

    /// Pixel bytes of row `y`, or `None` if out of range.
    pub fn try_row(&self, y: u32) -> Option<&'a [u8]> {
        (y < self.info.height).then(|| self.row(y))
    }

    /// Iterate over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> {
        let view = *self;
        (0..self.info.height).map(move |y| view.row(y))
    }

    /// Encoded bytes of the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of range.
    #[inline]
    pub fn pixel_bytes(&self, x: u32, y: u32) -> &'a [u8] {
        let size = self.info.pixel_size();
        let start = x as usize * size;
        &self.row(y)[start..start + size]
    }

    /// Decode the pixel at (x, y) with codec `P`.
    ///
    /// # Errors
    ///
    /// - [`Error::FormatMismatch`] if `P` does not match the raster format
    /// - [`Error::IndexOutOfBounds`] if (x, y) is outside the raster
    pub fn pixel<P: PixelCodec>(&self, x: u32, y: u32) -> Result<P> {
        self.info.check_format::<P>()?;
        self.info.check_point(x, y)?;
        Ok(P::read(self.pixel_bytes(x, y)))
    }

    /// Sub-view of a rectangle, sharing this view's memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the rectangle leaves the view.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<RasterView<'a>> {
        let (offset, info) = self.info.crop(x, y, width, height)?;
        let data = if info.is_empty() {
            Default::default()
        } else {
            &self.data[offset..]
        };
        RasterView::new(info, data)
    }
}

// ============================================================================
// Read-write view
// ============================================================================

/// Read-write view over pixel memory
#[derive(Debug)]
pub struct RasterViewMut<'a> {
    info: RasterInfo,
    data: &'a mut [u8],
}

impl<'a> RasterViewMut<'a> {
    /// Wrap `data` described by `info`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `data` cannot hold every row.
    pub fn new(info: RasterInfo, data: &'a mut [u8]) -> Result<Self> {
        info.check_buffer(data.len())?;
        Ok(Self { info, data })
    }

    pub(crate) fn from_parts(info: RasterInfo, data: &'a mut [u8]) -> Self {
        debug_assert!(data.len() >= info.required_len());
        Self { info, data }
    }

    /// Wrap a continuous buffer.
    pub fn from_continuous(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &'a mut [u8],
    ) -> Result<Self> {
        Self::new(RasterInfo::new(width, height, format), data)
    }

    pub fn info(&self) -> RasterInfo {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn stride(&self) -> usize {
        self.info.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format
    }

    pub fn is_continuous(&self) -> bool {
        self.info.is_continuous()
    }

    /// Read-only view of the same memory.
    pub fn as_view(&self) -> RasterView<'_> {
        RasterView {
            info: self.info,
            data: &*self.data,
        }
    }

    /// Shorter-lived mutable view of the same memory.
    pub fn reborrow(&mut self) -> RasterViewMut<'_> {
        RasterViewMut {
            info: self.info,
            data: &mut *self.data,
        }
    }

    /// Pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.info.height, "row {y} out of range");
        let start = y as usize * self.info.stride;
        &self.data[start..start + self.info.row_len()]
    }

    /// Mutable pixel bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.info.height, "row {y} out of range");
        let start = y as usize * self.info.stride;
        let len = self.info.row_len();
        &mut self.data[start..start + len]
    }

    #[inline]
    pub fn pixel_bytes(&self, x: u32, y: u32) -> &[u8] {
        let size = self.info.pixel_size();
        let start = x as usize * size;
        &self.row(y)[start..start + size]
    }

    #[inline]
    pub fn pixel_bytes_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let size = self.info.pixel_size();
        let start = x as usize * size;
        &mut self.row_mut(y)[start..start + size]
    }

    /// Decode the pixel at (x, y) with codec `P`.
    pub fn pixel<P: PixelCodec>(&self, x: u32, y: u32) -> Result<P> {
        self.info.check_format::<P>()?;
        self.info.check_point(x, y)?;
        Ok(P::read(self.pixel_bytes(x, y)))
    }

    /// Encode `value` at (x, y) with codec `P`.
    ///
    /// # Errors
    ///
    /// - [`Error::FormatMismatch`] if `P` does not match the raster format
    /// - [`Error::IndexOutOfBounds`] if (x, y) is outside the raster
    pub fn set_pixel<P: PixelCodec>(&mut self, x: u32, y: u32, value: P) -> Result<()> {
        self.info.check_format::<P>()?;
        self.info.check_point(x, y)?;
        value.write(self.pixel_bytes_mut(x, y));
        Ok(())
    }

    /// Set every pixel to the encoded value `pixel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `pixel` is not one pixel long.
    pub fn fill(&mut self, pixel: &[u8]) -> Result<()> {
        let size = self.info.pixel_size();
        if pixel.len() != size {
            return Err(Error::InvalidParameter(format!(
                "fill value is {} bytes, pixel is {size}",
                pixel.len()
            )));
        }
        for y in 0..self.info.height {
            for dst in self.row_mut(y).chunks_exact_mut(size) {
                dst.copy_from_slice(pixel);
            }
        }
        Ok(())
    }

    /// Set every pixel to `value`.
    pub fn fill_pixel<P: PixelCodec>(&mut self, value: P) -> Result<()> {
        self.info.check_format::<P>()?;
        let mut encoded = [0u8; 16];
        let size = self.info.pixel_size();
        value.write(&mut encoded[..size]);
        self.fill(&encoded[..size])
    }

    /// Mutable sub-view of a rectangle, sharing this view's memory.
    pub fn crop_mut(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<RasterViewMut<'_>> {
        let (offset, info) = self.info.crop(x, y, width, height)?;
        let data = if info.is_empty() {
            Default::default()
        } else {
            &mut self.data[offset..]
        };
        RasterViewMut::new(info, data)
    }

    /// Consume into a sub-view with the full lifetime.
    pub fn into_crop(self, x: u32, y: u32, width: u32, height: u32) -> Result<RasterViewMut<'a>> {
        let (offset, info) = self.info.crop(x, y, width, height)?;
        let data = self.data;
        let data = if info.is_empty() {
            Default::default()
        } else {
            &mut data[offset..]
        };
        RasterViewMut::new(info, data)
    }
}
