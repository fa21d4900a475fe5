//! Per-format pixel codecs
//!
//! Each supported [`PixelFormat`] has a small value type implementing
//! [`PixelCodec`]: reading from and writing to raw bytes, conversion to and
//! from three hub representations, and quantized bilinear interpolation.
//!
//! # Hubs
//!
//! - [`Bgra32`]: 8-bit straight alpha, the general path
//! - [`Bgrp32`]: 8-bit premultiplied alpha, used between premultiplied
//!   formats and for compositing
//! - [`Rgba128F`]: float straight alpha, used between float formats
//!
//! Conversions between two formats of the same family go through that
//! family's hub, so 8-bit to 8-bit and float to float never lose precision.
//!
//! # Interpolation weights
//!
//! [`PixelCodec::lerp4`] takes horizontal and vertical weights in the 10-bit
//! domain `0..=LERP_ONE`. A weight of 0 selects the left/top neighbor.

use crate::format::PixelFormat;
use std::fmt::Debug;

/// Interpolation weight shift (10 fractional bits)
pub const LERP_SHIFT: u32 = 10;
/// Weight representing 1.0
pub const LERP_ONE: u32 = 1 << LERP_SHIFT;

const LERP4_SHIFT: u32 = 2 * LERP_SHIFT;
const LERP4_HALF: u32 = 1 << (LERP4_SHIFT - 1);

/// A pixel value with a fixed memory encoding.
pub trait PixelCodec: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Format this codec reads and writes
    const FORMAT: PixelFormat;

    /// Decode one pixel from `FORMAT.byte_size()` bytes.
    fn read(bytes: &[u8]) -> Self;

    /// Encode into `FORMAT.byte_size()` bytes.
    fn write(self, bytes: &mut [u8]);

    fn to_bgra(self) -> Bgra32;

    fn from_bgra(color: Bgra32) -> Self;

    fn to_premul(self) -> Bgrp32 {
        Bgrp32::premultiply(self.to_bgra())
    }

    fn from_premul(color: Bgrp32) -> Self {
        Self::from_bgra(color.unpremultiply())
    }

    fn to_rgba_f32(self) -> Rgba128F {
        Rgba128F::from_bgra_u8(self.to_bgra())
    }

    fn from_rgba_f32(color: Rgba128F) -> Self {
        Self::from_bgra(color.quantize())
    }

    /// Blend four neighbors with 10-bit weights.
    ///
    /// `p00` is (x, y), `p10` is (x+1, y), `p01` is (x, y+1) and `p11` is
    /// (x+1, y+1). `wx` and `wy` lie in `0..=LERP_ONE`.
    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self;
}

#[inline]
fn lerp4_u8(v00: u8, v10: u8, v01: u8, v11: u8, wx: u32, wy: u32) -> u8 {
    let ix = LERP_ONE - wx;
    let iy = LERP_ONE - wy;
    let sum = v00 as u32 * ix * iy
        + v10 as u32 * wx * iy
        + v01 as u32 * ix * wy
        + v11 as u32 * wx * wy;
    ((sum + LERP4_HALF) >> LERP4_SHIFT) as u8
}

#[inline]
fn lerp4_f32(v00: f32, v10: f32, v01: f32, v11: f32, wx: u32, wy: u32) -> f32 {
    let fx = wx as f32 / LERP_ONE as f32;
    let fy = wy as f32 / LERP_ONE as f32;
    let top = v00 + (v10 - v00) * fx;
    let bottom = v01 + (v11 - v01) * fx;
    top + (bottom - top) * fy
}

#[inline]
fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[inline]
fn u8_to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline]
fn read_f32s<const N: usize>(bytes: &[u8]) -> [f32; N] {
    bytemuck::pod_read_unaligned(&bytes[..N * 4])
}

#[inline]
fn write_f32s<const N: usize>(values: [f32; N], bytes: &mut [u8]) {
    bytes[..N * 4].copy_from_slice(bytemuck::bytes_of(&values));
}

// ============================================================================
// 8-bit straight hub
// ============================================================================

/// 8-bit BGRA with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bgra32 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra32 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r, a: 255 }
    }

    /// Integer luminance, exact for gray inputs.
    pub fn luma(self) -> u8 {
        ((self.r as u32 * 77 + self.g as u32 * 150 + self.b as u32 * 29 + 128) >> 8) as u8
    }
}

impl PixelCodec for Bgra32 {
    const FORMAT: PixelFormat = PixelFormat::BGRA32;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
            a: bytes[3],
        }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&[self.b, self.g, self.r, self.a]);
    }

    #[inline]
    fn to_bgra(self) -> Bgra32 {
        self
    }

    #[inline]
    fn from_bgra(color: Bgra32) -> Self {
        color
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        if wx == 0 && wy == 0 {
            return p00;
        }
        // Weight color by alpha at full precision, then divide by the
        // blended alpha. No 8-bit premultiplied value is ever formed.
        let ix = (LERP_ONE - wx) as u64;
        let iy = (LERP_ONE - wy) as u64;
        let (wx, wy) = (wx as u64, wy as u64);
        let taps = [(p00, ix * iy), (p10, wx * iy), (p01, ix * wy), (p11, wx * wy)];
        let alpha: u64 = taps.iter().map(|(p, w)| p.a as u64 * w).sum();
        if alpha == 0 {
            return Self::default();
        }
        let channel = |get: fn(&Self) -> u8| {
            let sum: u64 = taps.iter().map(|(p, w)| get(p) as u64 * p.a as u64 * w).sum();
            ((sum + alpha / 2) / alpha).min(255) as u8
        };
        Self {
            b: channel(|p| p.b),
            g: channel(|p| p.g),
            r: channel(|p| p.r),
            a: ((alpha + LERP4_HALF as u64) >> LERP4_SHIFT) as u8,
        }
    }
}

// ============================================================================
// 8-bit premultiplied hub
// ============================================================================

/// 8-bit BGRA with premultiplied alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bgrp32 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgrp32 {
    pub const TRANSPARENT: Self = Self {
        b: 0,
        g: 0,
        r: 0,
        a: 0,
    };

    pub fn premultiply(c: Bgra32) -> Self {
        let a = c.a as u32;
        let mul = |v: u8| ((v as u32 * a + 127) / 255) as u8;
        Self {
            b: mul(c.b),
            g: mul(c.g),
            r: mul(c.r),
            a: c.a,
        }
    }

    pub fn unpremultiply(self) -> Bgra32 {
        if self.a == 0 {
            return Bgra32::default();
        }
        let a = self.a as u32;
        let div = |v: u8| ((v as u32 * 255 + a / 2) / a).min(255) as u8;
        Bgra32 {
            b: div(self.b),
            g: div(self.g),
            r: div(self.r),
            a: self.a,
        }
    }

    /// Scale every channel by `factor / 256`.
    #[inline]
    pub fn scale(self, factor: u32) -> Self {
        let mul = |v: u8| ((v as u32 * factor) >> 8) as u8;
        Self {
            b: mul(self.b),
            g: mul(self.g),
            r: mul(self.r),
            a: mul(self.a),
        }
    }

    /// Source-over: place `self` on top of `dst`.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let inv = 255 - self.a as u32;
        let blend = |s: u8, d: u8| (s as u32 + (d as u32 * inv + 127) / 255).min(255) as u8;
        Self {
            b: blend(self.b, dst.b),
            g: blend(self.g, dst.g),
            r: blend(self.r, dst.r),
            a: blend(self.a, dst.a),
        }
    }
}

impl PixelCodec for Bgrp32 {
    const FORMAT: PixelFormat = PixelFormat::BGRP32;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
            a: bytes[3],
        }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&[self.b, self.g, self.r, self.a]);
    }

    fn to_bgra(self) -> Bgra32 {
        self.unpremultiply()
    }

    fn from_bgra(color: Bgra32) -> Self {
        Self::premultiply(color)
    }

    #[inline]
    fn to_premul(self) -> Bgrp32 {
        self
    }

    #[inline]
    fn from_premul(color: Bgrp32) -> Self {
        color
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self {
            b: lerp4_u8(p00.b, p10.b, p01.b, p11.b, wx, wy),
            g: lerp4_u8(p00.g, p10.g, p01.g, p11.g, wx, wy),
            r: lerp4_u8(p00.r, p10.r, p01.r, p11.r, wx, wy),
            a: lerp4_u8(p00.a, p10.a, p01.a, p11.a, wx, wy),
        }
    }
}

/// 8-bit RGBA with premultiplied alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgbp32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PixelCodec for Rgbp32 {
    const FORMAT: PixelFormat = PixelFormat::RGBP32;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: bytes[3],
        }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&[self.r, self.g, self.b, self.a]);
    }

    fn to_bgra(self) -> Bgra32 {
        self.to_premul().unpremultiply()
    }

    fn from_bgra(color: Bgra32) -> Self {
        Self::from_premul(Bgrp32::premultiply(color))
    }

    #[inline]
    fn to_premul(self) -> Bgrp32 {
        Bgrp32 {
            b: self.b,
            g: self.g,
            r: self.r,
            a: self.a,
        }
    }

    #[inline]
    fn from_premul(c: Bgrp32) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self {
            r: lerp4_u8(p00.r, p10.r, p01.r, p11.r, wx, wy),
            g: lerp4_u8(p00.g, p10.g, p01.g, p11.g, wx, wy),
            b: lerp4_u8(p00.b, p10.b, p01.b, p11.b, wx, wy),
            a: lerp4_u8(p00.a, p10.a, p01.a, p11.a, wx, wy),
        }
    }
}

// ============================================================================
// 8-bit straight formats
// ============================================================================

/// 8-bit luminance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gray8(pub u8);

impl PixelCodec for Gray8 {
    const FORMAT: PixelFormat = PixelFormat::GRAY8;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self(bytes[0])
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[0] = self.0;
    }

    fn to_bgra(self) -> Bgra32 {
        Bgra32::opaque(self.0, self.0, self.0)
    }

    fn from_bgra(color: Bgra32) -> Self {
        Self(color.luma())
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self(lerp4_u8(p00.0, p10.0, p01.0, p11.0, wx, wy))
    }
}

/// 8-bit BGR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bgr24 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl PixelCodec for Bgr24 {
    const FORMAT: PixelFormat = PixelFormat::BGR24;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
        }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..3].copy_from_slice(&[self.b, self.g, self.r]);
    }

    fn to_bgra(self) -> Bgra32 {
        Bgra32::opaque(self.r, self.g, self.b)
    }

    fn from_bgra(c: Bgra32) -> Self {
        Self {
            b: c.b,
            g: c.g,
            r: c.r,
        }
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self {
            b: lerp4_u8(p00.b, p10.b, p01.b, p11.b, wx, wy),
            g: lerp4_u8(p00.g, p10.g, p01.g, p11.g, wx, wy),
            r: lerp4_u8(p00.r, p10.r, p01.r, p11.r, wx, wy),
        }
    }
}

/// 8-bit RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb24 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PixelCodec for Rgb24 {
    const FORMAT: PixelFormat = PixelFormat::RGB24;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
        }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..3].copy_from_slice(&[self.r, self.g, self.b]);
    }

    fn to_bgra(self) -> Bgra32 {
        Bgra32::opaque(self.r, self.g, self.b)
    }

    fn from_bgra(c: Bgra32) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self {
            r: lerp4_u8(p00.r, p10.r, p01.r, p11.r, wx, wy),
            g: lerp4_u8(p00.g, p10.g, p01.g, p11.g, wx, wy),
            b: lerp4_u8(p00.b, p10.b, p01.b, p11.b, wx, wy),
        }
    }
}

/// 8-bit RGBA with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PixelCodec for Rgba32 {
    const FORMAT: PixelFormat = PixelFormat::RGBA32;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
            a: bytes[3],
        }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&[self.r, self.g, self.b, self.a]);
    }

    fn to_bgra(self) -> Bgra32 {
        Bgra32::new(self.r, self.g, self.b, self.a)
    }

    fn from_bgra(c: Bgra32) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self::from_bgra(Bgra32::lerp4(
            p00.to_bgra(),
            p10.to_bgra(),
            p01.to_bgra(),
            p11.to_bgra(),
            wx,
            wy,
        ))
    }
}

/// 8-bit ARGB with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb32 {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PixelCodec for Argb32 {
    const FORMAT: PixelFormat = PixelFormat::ARGB32;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        Self {
            a: bytes[0],
            r: bytes[1],
            g: bytes[2],
            b: bytes[3],
        }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&[self.a, self.r, self.g, self.b]);
    }

    fn to_bgra(self) -> Bgra32 {
        Bgra32::new(self.r, self.g, self.b, self.a)
    }

    fn from_bgra(c: Bgra32) -> Self {
        Self {
            a: c.a,
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self::from_bgra(Bgra32::lerp4(
            p00.to_bgra(),
            p10.to_bgra(),
            p01.to_bgra(),
            p11.to_bgra(),
            wx,
            wy,
        ))
    }
}

// ============================================================================
// Float formats
// ============================================================================

/// 32-bit float RGBA with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba128F {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba128F {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn from_bgra_u8(c: Bgra32) -> Self {
        Self {
            r: u8_to_unit(c.r),
            g: u8_to_unit(c.g),
            b: u8_to_unit(c.b),
            a: u8_to_unit(c.a),
        }
    }

    /// Round to 8-bit channels, clamping to the unit range.
    pub fn quantize(self) -> Bgra32 {
        Bgra32::new(
            unit_to_u8(self.r),
            unit_to_u8(self.g),
            unit_to_u8(self.b),
            unit_to_u8(self.a),
        )
    }
}

impl PixelCodec for Rgba128F {
    const FORMAT: PixelFormat = PixelFormat::RGBA128F;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        let [r, g, b, a] = read_f32s::<4>(bytes);
        Self { r, g, b, a }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        write_f32s([self.r, self.g, self.b, self.a], bytes);
    }

    fn to_bgra(self) -> Bgra32 {
        self.quantize()
    }

    fn from_bgra(color: Bgra32) -> Self {
        Self::from_bgra_u8(color)
    }

    #[inline]
    fn to_rgba_f32(self) -> Rgba128F {
        self
    }

    #[inline]
    fn from_rgba_f32(color: Rgba128F) -> Self {
        color
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        if wx == 0 && wy == 0 {
            return p00;
        }
        // premultiply so transparent neighbors do not bleed their color
        let pre = |p: Self| [p.r * p.a, p.g * p.a, p.b * p.a, p.a];
        let (q00, q10, q01, q11) = (pre(p00), pre(p10), pre(p01), pre(p11));
        let mut out = [0.0f32; 4];
        for (i, v) in out.iter_mut().enumerate() {
            *v = lerp4_f32(q00[i], q10[i], q01[i], q11[i], wx, wy);
        }
        let a = out[3];
        if a <= 0.0 {
            return Self::default();
        }
        Self::new(out[0] / a, out[1] / a, out[2] / a, a)
    }
}

/// 32-bit float RGB
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb96F {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb96F {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl PixelCodec for Rgb96F {
    const FORMAT: PixelFormat = PixelFormat::RGB96F;

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        let [r, g, b] = read_f32s::<3>(bytes);
        Self { r, g, b }
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        write_f32s([self.r, self.g, self.b], bytes);
    }

    fn to_bgra(self) -> Bgra32 {
        Bgra32::opaque(unit_to_u8(self.r), unit_to_u8(self.g), unit_to_u8(self.b))
    }

    fn from_bgra(c: Bgra32) -> Self {
        Self::new(u8_to_unit(c.r), u8_to_unit(c.g), u8_to_unit(c.b))
    }

    #[inline]
    fn to_rgba_f32(self) -> Rgba128F {
        Rgba128F::new(self.r, self.g, self.b, 1.0)
    }

    #[inline]
    fn from_rgba_f32(c: Rgba128F) -> Self {
        Self::new(c.r, c.g, c.b)
    }

    fn lerp4(p00: Self, p10: Self, p01: Self, p11: Self, wx: u32, wy: u32) -> Self {
        Self::new(
            lerp4_f32(p00.r, p10.r, p01.r, p11.r, wx, wy),
            lerp4_f32(p00.g, p10.g, p01.g, p11.g, wx, wy),
            lerp4_f32(p00.b, p10.b, p01.b, p11.b, wx, wy),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_layouts() {
        let mut buf = [0u8; 4];
        Bgra32::new(1, 2, 3, 4).write(&mut buf);
        assert_eq!(buf, [3, 2, 1, 4]);
        Rgba32 { r: 1, g: 2, b: 3, a: 4 }.write(&mut buf);
        assert_eq!(buf, [1, 2, 3, 4]);
        Argb32 { a: 4, r: 1, g: 2, b: 3 }.write(&mut buf);
        assert_eq!(buf, [4, 1, 2, 3]);
        assert_eq!(Bgr24::read(&[10, 20, 30]).to_bgra(), Bgra32::opaque(30, 20, 10));
    }

    #[test]
    fn test_float_read_write() {
        let mut buf = [0u8; 16];
        let p = Rgba128F::new(0.25, 0.5, 0.75, 1.0);
        p.write(&mut buf);
        assert_eq!(Rgba128F::read(&buf), p);
        let mut buf3 = [0u8; 12];
        Rgb96F::new(1.0, 0.0, 0.5).write(&mut buf3);
        assert_eq!(Rgb96F::read(&buf3), Rgb96F::new(1.0, 0.0, 0.5));
    }

    #[test]
    fn test_premultiply_opaque_is_exact() {
        for v in 0..=255u8 {
            let c = Bgra32::opaque(v, 255 - v, v / 2);
            assert_eq!(Bgrp32::premultiply(c).unpremultiply(), c);
        }
    }

    #[test]
    fn test_premultiply_half_alpha() {
        let p = Bgrp32::premultiply(Bgra32::new(255, 128, 0, 128));
        assert_eq!((p.r, p.g, p.b, p.a), (128, 64, 0, 128));
        assert_eq!(Bgrp32::premultiply(Bgra32::new(200, 10, 10, 0)), Bgrp32::TRANSPARENT);
    }

    #[test]
    fn test_gray_luma_exact_for_gray() {
        for v in 0..=255u8 {
            assert_eq!(Gray8::from_bgra(Gray8(v).to_bgra()), Gray8(v));
        }
    }

    #[test]
    fn test_lerp4_corners() {
        let a = Gray8(10);
        let b = Gray8(20);
        let c = Gray8(30);
        let d = Gray8(40);
        assert_eq!(Gray8::lerp4(a, b, c, d, 0, 0), a);
        assert_eq!(Gray8::lerp4(a, b, c, d, LERP_ONE, 0), b);
        assert_eq!(Gray8::lerp4(a, b, c, d, 0, LERP_ONE), c);
        assert_eq!(Gray8::lerp4(a, b, c, d, LERP_ONE, LERP_ONE), d);
        assert_eq!(Gray8::lerp4(a, b, c, d, LERP_ONE / 2, LERP_ONE / 2), Gray8(25));
    }

    #[test]
    fn test_lerp4_straight_alpha_ignores_transparent_color() {
        let red = Bgra32::new(255, 0, 0, 255);
        let clear_blue = Bgra32::new(0, 0, 255, 0);
        let mid = Bgra32::lerp4(red, clear_blue, red, clear_blue, LERP_ONE / 2, 0);
        assert_eq!(mid.b, 0);
        assert_eq!(mid.r, 255);
        assert_eq!(mid.a, 128);
    }

    #[test]
    fn test_lerp4_straight_alpha_on_grid_is_exact() {
        let n = Bgra32::new(1, 2, 3, 4);
        for a in [0u8, 3, 128, 254, 255] {
            let p = Bgra32::new(200, 100, 7, a);
            assert_eq!(Bgra32::lerp4(p, n, n, n, 0, 0), p);
            let q = Rgba128F::new(0.3, 0.7, 0.1, a as f32 / 255.0);
            let m = Rgba128F::new(1.0, 0.0, 1.0, 1.0);
            assert_eq!(Rgba128F::lerp4(q, m, m, m, 0, 0), q);
        }
    }

    #[test]
    fn test_lerp4_straight_alpha_keeps_color_of_translucent_taps() {
        // equal colors blend to the same color whatever the alphas
        let a = Bgra32::new(200, 100, 7, 3);
        let b = Bgra32::new(200, 100, 7, 128);
        let mid = Bgra32::lerp4(a, b, a, b, LERP_ONE / 2, LERP_ONE / 3);
        assert_eq!((mid.r, mid.g, mid.b), (200, 100, 7));
        assert!(mid.a > 3 && mid.a < 128);
    }

    #[test]
    fn test_over() {
        let dst = Bgrp32::premultiply(Bgra32::opaque(0, 0, 200));
        // transparent source leaves destination untouched
        assert_eq!(Bgrp32::TRANSPARENT.over(dst), dst);
        // opaque source replaces destination
        let src = Bgrp32::premultiply(Bgra32::opaque(50, 60, 70));
        assert_eq!(src.over(dst), src);
    }

    #[test]
    fn test_scale() {
        let p = Bgrp32 {
            b: 200,
            g: 100,
            r: 50,
            a: 255,
        };
        assert_eq!(p.scale(256), p);
        assert_eq!(p.scale(0), Bgrp32::TRANSPARENT);
        assert_eq!(p.scale(128).a, 127);
    }

    #[test]
    fn test_float_quantize_rounds() {
        for v in 0..=255u8 {
            let f = Rgb96F::from_bgra(Bgra32::opaque(v, v, v));
            assert_eq!(f.to_bgra(), Bgra32::opaque(v, v, v));
        }
        assert_eq!(Rgba128F::new(2.0, -1.0, 0.5, 1.0).quantize(), Bgra32::new(255, 0, 128, 255));
    }
}
