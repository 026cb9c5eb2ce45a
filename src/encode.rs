//! Image encoding.

use alloc::vec::Vec;
use std::io::Write;

use log::debug;

use crate::codecs::{GifCodec, ImageEncoder, RawCodec};
use crate::config::CodecConfig;
use crate::image::ImageRef;
use crate::io::{DataWriter, MemoryWriter, StreamWriter};
use crate::{ImageError, ImageFormat};

/// Image encode request builder.
///
/// # Example
///
/// ```no_run
/// use zenraster::{EncodeRequest, Image, ImageFormat};
///
/// let image = Image::new(100, 100);
/// let png = EncodeRequest::new(ImageFormat::Png).encode_to_vec(&image)?;
/// # Ok::<(), zenraster::ImageError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EncodeRequest<'a> {
    format: ImageFormat,
    codec_config: Option<&'a CodecConfig>,
}

impl<'a> EncodeRequest<'a> {
    /// Encode to a specific format.
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            codec_config: None,
        }
    }

    /// Set format-specific codec configuration.
    pub fn with_codec_config(mut self, config: &'a CodecConfig) -> Self {
        self.codec_config = Some(config);
        self
    }

    /// Encode `image` into `writer`.
    ///
    /// [`ImageFormat::Raw`] writes the image buffer in its own layout.
    pub fn encode<'i>(
        &self,
        image: impl Into<ImageRef<'i>>,
        writer: &mut dyn DataWriter,
    ) -> Result<(), ImageError> {
        let image = image.into();
        debug!(
            "encode {}x{} {} as {:?}",
            image.width(),
            image.height(),
            image.color_spec(),
            self.format
        );

        match self.format {
            ImageFormat::Raw => RawCodec::new(image.width(), image.height(), image.color_spec())
                .encode(image, writer),

            #[cfg(feature = "png")]
            ImageFormat::Png => {
                let default_config = CodecConfig::default();
                crate::codecs::PngCodec::new()
                    .with_config(self.codec_config.unwrap_or(&default_config))
                    .encode(image, writer)
            }
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(ImageError::UnsupportedFormat(self.format)),

            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => {
                let default_config = CodecConfig::default();
                crate::codecs::JpegCodec::new()
                    .with_config(self.codec_config.unwrap_or(&default_config))
                    .encode(image, writer)
            }
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => Err(ImageError::UnsupportedFormat(self.format)),

            ImageFormat::Gif => GifCodec.encode(image, writer),
        }
    }

    /// Encode into a new `Vec<u8>`.
    pub fn encode_to_vec<'i>(&self, image: impl Into<ImageRef<'i>>) -> Result<Vec<u8>, ImageError> {
        let mut out = Vec::new();
        self.encode(image, &mut out)?;
        Ok(out)
    }

    /// Encode into a fixed buffer, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`ImageError::Io`] (`WriteZero`) when `buf` is too small.
    pub fn encode_to_slice<'i>(
        &self,
        image: impl Into<ImageRef<'i>>,
        buf: &mut [u8],
    ) -> Result<usize, ImageError> {
        let mut writer = MemoryWriter::new(buf);
        self.encode(image, &mut writer)?;
        Ok(writer.position())
    }

    /// Encode into a stream, handing it back afterwards.
    pub fn encode_stream<'i, W: Write>(
        &self,
        image: impl Into<ImageRef<'i>>,
        stream: W,
    ) -> Result<W, ImageError> {
        let mut writer = StreamWriter::new(stream);
        self.encode(image, &mut writer)?;
        Ok(writer.into_inner())
    }
}
