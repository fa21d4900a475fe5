//! Pixel format descriptors
//!
//! A [`PixelFormat`] describes how one pixel is laid out in memory: the
//! channel order, the width of each channel and whether color channels are
//! premultiplied by alpha. Formats are plain values; two formats are equal
//! exactly when their identity [`code`](PixelFormat::code) is equal.
//!
//! Any combination of layout and channel type can be described, which lets
//! foreign buffers be wrapped in a view. Only the combinations listed in
//! [`PixelFormat::ALL`] have a registered codec; the engines reject anything
//! else before touching a single pixel.

use std::fmt;

/// Channel order within a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelLayout {
    /// Single luminance channel
    Gray = 1,
    /// Blue, green, red
    Bgr = 2,
    /// Red, green, blue
    Rgb = 3,
    /// Blue, green, red, alpha
    Bgra = 4,
    /// Red, green, blue, alpha
    Rgba = 5,
    /// Alpha, red, green, blue
    Argb = 6,
}

impl ChannelLayout {
    /// Number of channels in this layout.
    pub const fn channels(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Bgr | ChannelLayout::Rgb => 3,
            ChannelLayout::Bgra | ChannelLayout::Rgba | ChannelLayout::Argb => 4,
        }
    }

    /// Whether the layout carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            ChannelLayout::Bgra | ChannelLayout::Rgba | ChannelLayout::Argb
        )
    }

    fn name(self) -> &'static str {
        match self {
            ChannelLayout::Gray => "Gray",
            ChannelLayout::Bgr => "Bgr",
            ChannelLayout::Rgb => "Rgb",
            ChannelLayout::Bgra => "Bgra",
            ChannelLayout::Rgba => "Rgba",
            ChannelLayout::Argb => "Argb",
        }
    }
}

/// Storage type of a single channel
///
/// The discriminant is the channel width in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelType {
    /// Unsigned 8-bit, 0..=255
    U8 = 1,
    /// 32-bit float, nominally 0.0..=1.0
    F32 = 4,
}

impl ChannelType {
    /// Width of one channel in bytes.
    pub const fn byte_width(self) -> usize {
        self as usize
    }
}

/// Memory encoding of one pixel
///
/// The byte size is always `channels * channel width`, so the invariant
/// holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    layout: ChannelLayout,
    channel: ChannelType,
    premultiplied: bool,
}

impl PixelFormat {
    /// 8-bit luminance
    pub const GRAY8: Self = Self::new(ChannelLayout::Gray, ChannelType::U8, false);
    /// 8-bit BGR
    pub const BGR24: Self = Self::new(ChannelLayout::Bgr, ChannelType::U8, false);
    /// 8-bit RGB
    pub const RGB24: Self = Self::new(ChannelLayout::Rgb, ChannelType::U8, false);
    /// 8-bit BGRA, straight alpha
    pub const BGRA32: Self = Self::new(ChannelLayout::Bgra, ChannelType::U8, false);
    /// 8-bit RGBA, straight alpha
    pub const RGBA32: Self = Self::new(ChannelLayout::Rgba, ChannelType::U8, false);
    /// 8-bit ARGB, straight alpha
    pub const ARGB32: Self = Self::new(ChannelLayout::Argb, ChannelType::U8, false);
    /// 8-bit BGRA, premultiplied alpha
    pub const BGRP32: Self = Self::new(ChannelLayout::Bgra, ChannelType::U8, true);
    /// 8-bit RGBA, premultiplied alpha
    pub const RGBP32: Self = Self::new(ChannelLayout::Rgba, ChannelType::U8, true);
    /// 32-bit float RGB
    pub const RGB96F: Self = Self::new(ChannelLayout::Rgb, ChannelType::F32, false);
    /// 32-bit float RGBA, straight alpha
    pub const RGBA128F: Self = Self::new(ChannelLayout::Rgba, ChannelType::F32, false);

    /// Every format with a registered codec.
    pub const ALL: [PixelFormat; 10] = [
        Self::GRAY8,
        Self::BGR24,
        Self::RGB24,
        Self::BGRA32,
        Self::RGBA32,
        Self::ARGB32,
        Self::BGRP32,
        Self::RGBP32,
        Self::RGB96F,
        Self::RGBA128F,
    ];

    /// Describe a format.
    ///
    /// `premultiplied` is ignored for layouts without alpha.
    pub const fn new(layout: ChannelLayout, channel: ChannelType, premultiplied: bool) -> Self {
        Self {
            layout,
            channel,
            premultiplied: premultiplied && layout.has_alpha(),
        }
    }

    /// Identity code: `layout << 16 | channel width << 8 | premultiplied`.
    pub const fn code(self) -> u32 {
        ((self.layout as u32) << 16) | ((self.channel as u32) << 8) | (self.premultiplied as u32)
    }

    /// Rebuild a format from its identity code.
    pub fn from_code(code: u32) -> Option<Self> {
        let layout = match (code >> 16) & 0xff {
            1 => ChannelLayout::Gray,
            2 => ChannelLayout::Bgr,
            3 => ChannelLayout::Rgb,
            4 => ChannelLayout::Bgra,
            5 => ChannelLayout::Rgba,
            6 => ChannelLayout::Argb,
            _ => return None,
        };
        let channel = match (code >> 8) & 0xff {
            1 => ChannelType::U8,
            4 => ChannelType::F32,
            _ => return None,
        };
        let format = Self::new(layout, channel, code & 1 == 1);
        (format.code() == code).then_some(format)
    }

    /// Channel order.
    pub const fn layout(self) -> ChannelLayout {
        self.layout
    }

    /// Channel storage type.
    pub const fn channel_type(self) -> ChannelType {
        self.channel
    }

    /// Number of channels.
    pub const fn channel_count(self) -> usize {
        self.layout.channels()
    }

    /// Bytes per pixel.
    pub const fn byte_size(self) -> usize {
        self.layout.channels() * self.channel.byte_width()
    }

    pub const fn has_alpha(self) -> bool {
        self.layout.has_alpha()
    }

    pub const fn is_premultiplied(self) -> bool {
        self.premultiplied
    }

    pub const fn is_float(self) -> bool {
        matches!(self.channel, ChannelType::F32)
    }

    /// Whether a codec is registered for this format.
    pub fn is_supported(self) -> bool {
        Self::ALL.contains(&self)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.byte_size() * 8;
        let suffix = match self.channel {
            ChannelType::U8 => "",
            ChannelType::F32 => "F",
        };
        if self.premultiplied {
            // Bgra -> Bgrp, Rgba -> Rgbp
            let name = self.layout.name();
            write!(f, "{}p{}{}", &name[..name.len() - 1], bits, suffix)
        } else {
            write!(f, "{}{}{}", self.layout.name(), bits, suffix)
        }
    }
}
