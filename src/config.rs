//! Format-specific codec configuration and re-exports.
//!
//! Each codec's configuration types are re-exported behind feature gates.
//! The [`CodecConfig`] struct bundles all format-specific overrides into
//! a single value that can be passed to encode requests.

/// PNG configuration types from png crate.
#[cfg(feature = "png")]
pub mod png_codec {
    pub use png::{Compression, Filter};
}

/// Format-specific encoder overrides.
///
/// Fields left as `None` use the codec's defaults.
///
/// # Example
///
/// ```
/// use zenraster::{EncodeRequest, ImageFormat};
/// use zenraster::config::{png_codec::Compression, CodecConfig};
///
/// let config = CodecConfig::default().with_png_compression(Compression::High);
/// let request = EncodeRequest::new(ImageFormat::Png).with_codec_config(&config);
/// # let _ = request;
/// ```
#[derive(Clone, Default)]
#[non_exhaustive]
pub struct CodecConfig {
    /// PNG compression level.
    #[cfg(feature = "png")]
    pub png_compression: Option<png::Compression>,

    /// PNG filter strategy.
    #[cfg(feature = "png")]
    pub png_filter: Option<png::Filter>,

    /// JPEG quality, 1 to 100. Defaults to 75.
    #[cfg(feature = "jpeg")]
    pub jpeg_quality: Option<u8>,
}

impl CodecConfig {
    /// Set PNG compression level.
    #[cfg(feature = "png")]
    pub fn with_png_compression(mut self, compression: png::Compression) -> Self {
        self.png_compression = Some(compression);
        self
    }

    /// Set PNG filter strategy.
    #[cfg(feature = "png")]
    pub fn with_png_filter(mut self, filter: png::Filter) -> Self {
        self.png_filter = Some(filter);
        self
    }

    /// Set JPEG quality. Values outside 1..=100 are clamped when encoding.
    #[cfg(feature = "jpeg")]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }
}

impl core::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut d = f.debug_struct("CodecConfig");

        #[cfg(feature = "png")]
        {
            d.field("png_compression", &self.png_compression);
            d.field("png_filter", &self.png_filter);
        }

        #[cfg(feature = "jpeg")]
        d.field("jpeg_quality", &self.jpeg_quality);

        d.finish()
    }
}
