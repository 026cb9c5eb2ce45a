//! Pixel format descriptors.
//!
//! A [`ColorSpec`] pairs a channel layout ([`PixelFormat`]) with a channel
//! storage width ([`ChannelDepth`]). Buffer-size math goes through the
//! accessor functions below, never through enum discriminants.

use core::fmt;

/// Channel layout of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single luminance channel.
    Monochromatic,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl PixelFormat {
    /// Number of interleaved channels.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Self::Monochromatic => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Whether the last channel is alpha.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }
}

/// Storage width of a single channel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelDepth {
    /// 8-bit unsigned (1 byte per channel).
    Bits8,
    /// 16-bit unsigned, native byte order (2 bytes per channel).
    Bits16,
}

impl ChannelDepth {
    /// Bytes occupied by one channel value.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits8 => 1,
            Self::Bits16 => 2,
        }
    }

    /// Bits per channel value.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
        }
    }

    /// Largest representable channel value (full opacity for alpha).
    #[inline]
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Bits8 => u8::MAX as u16,
            Self::Bits16 => u16::MAX,
        }
    }
}

/// Immutable `{format, depth}` pair. Any combination is a legal spec;
/// whether a conversion exists between two specs is decided by
/// [`crate::convert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorSpec {
    format: PixelFormat,
    depth: ChannelDepth,
}

impl ColorSpec {
    /// 8-bit RGB.
    pub const RGB8: Self = Self::new(PixelFormat::Rgb, ChannelDepth::Bits8);
    /// 8-bit RGBA.
    pub const RGBA8: Self = Self::new(PixelFormat::Rgba, ChannelDepth::Bits8);
    /// 16-bit RGB.
    pub const RGB16: Self = Self::new(PixelFormat::Rgb, ChannelDepth::Bits16);
    /// 16-bit RGBA.
    pub const RGBA16: Self = Self::new(PixelFormat::Rgba, ChannelDepth::Bits16);
    /// 8-bit grayscale.
    pub const GRAY8: Self = Self::new(PixelFormat::Monochromatic, ChannelDepth::Bits8);
    /// 16-bit grayscale.
    pub const GRAY16: Self = Self::new(PixelFormat::Monochromatic, ChannelDepth::Bits16);

    pub const fn new(format: PixelFormat, depth: ChannelDepth) -> Self {
        Self { format, depth }
    }

    #[inline]
    pub const fn format(self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub const fn channel_depth(self) -> ChannelDepth {
        self.depth
    }

    #[inline]
    pub const fn channels(self) -> usize {
        self.format.channels()
    }

    #[inline]
    pub const fn bytes_per_channel(self) -> usize {
        self.depth.bytes()
    }

    /// Bytes per pixel: channel count × bytes per channel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self.format.channels() * self.depth.bytes()
    }

    #[inline]
    pub const fn has_alpha(self) -> bool {
        self.format.has_alpha()
    }

    /// Bytes per row for `width` pixels. Rows carry no padding.
    pub fn row_bytes(self, width: u32) -> Option<usize> {
        (width as usize).checked_mul(self.bytes_per_pixel())
    }

    /// Total buffer size for a `width × height` image, `None` on overflow.
    pub fn buffer_size(self, width: u32, height: u32) -> Option<usize> {
        self.row_bytes(width)?.checked_mul(height as usize)
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::RGB8
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.format {
            PixelFormat::Monochromatic => "Gray",
            PixelFormat::Rgb => "RGB",
            PixelFormat::Rgba => "RGBA",
        };
        write!(f, "{}{}", name, self.depth.bits())
    }
}
