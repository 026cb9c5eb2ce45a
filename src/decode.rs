//! Image decoding.

use std::io::{Read, Seek};

use log::debug;

use crate::codecs::{GifCodec, ImageDecoder, RawCodec};
use crate::io::{DataReader, MemoryReader, StreamReader};
use crate::{ColorSpec, Image, ImageError, ImageFormat, Limits};

/// Image decode request builder.
///
/// The container format must be named with [`with_format`](Self::with_format);
/// there is no content sniffing.
///
/// # Example
///
/// ```no_run
/// use zenraster::{ColorSpec, DecodeRequest, ImageFormat};
///
/// let data: &[u8] = &[]; // your PNG bytes
/// let image = DecodeRequest::new()
///     .with_format(ImageFormat::Png)
///     .with_color_spec(ColorSpec::RGBA8)
///     .decode_slice(data)?;
/// println!("{}x{}", image.width(), image.height());
/// # Ok::<(), zenraster::ImageError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    format: Option<ImageFormat>,
    spec: ColorSpec,
    limits: Option<&'a Limits>,
    raw_layout: Option<(u32, u32, ColorSpec)>,
}

impl Default for DecodeRequest<'_> {
    fn default() -> Self {
        Self {
            format: None,
            spec: ColorSpec::RGBA8,
            limits: None,
            raw_layout: None,
        }
    }
}

impl<'a> DecodeRequest<'a> {
    /// Create a new decode request producing [`ColorSpec::RGBA8`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the format and depth of the decoded image.
    pub fn with_color_spec(mut self, spec: ColorSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Set resource limits.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Decode headerless pixel bytes of the given geometry and layout.
    ///
    /// Also sets the format to [`ImageFormat::Raw`].
    pub fn with_raw_layout(mut self, width: u32, height: u32, spec: ColorSpec) -> Self {
        self.format = Some(ImageFormat::Raw);
        self.raw_layout = Some((width, height, spec));
        self
    }

    /// Decode one image from `reader`.
    pub fn decode(&self, reader: &mut dyn DataReader) -> Result<Image, ImageError> {
        let format = self.format.ok_or(ImageError::NotImplemented("format detection"))?;
        debug!("decode {:?} as {}", format, self.spec);

        match format {
            ImageFormat::Raw => self.raw_codec()?.decode(reader, self.spec),

            #[cfg(feature = "png")]
            ImageFormat::Png => crate::codecs::PngCodec::new()
                .with_limits(self.limits())
                .decode(reader, self.spec),
            #[cfg(not(feature = "png"))]
            ImageFormat::Png => Err(ImageError::UnsupportedFormat(format)),

            #[cfg(feature = "jpeg")]
            ImageFormat::Jpeg => crate::codecs::JpegCodec::new()
                .with_limits(self.limits())
                .decode(reader, self.spec),
            #[cfg(not(feature = "jpeg"))]
            ImageFormat::Jpeg => Err(ImageError::UnsupportedFormat(format)),

            ImageFormat::Gif => GifCodec.decode(reader, self.spec),
        }
    }

    /// Decode from an in-memory buffer.
    pub fn decode_slice(&self, data: &[u8]) -> Result<Image, ImageError> {
        self.decode(&mut MemoryReader::new(data))
    }

    /// Decode from a seekable stream, starting at its current position.
    pub fn decode_stream<R: Read + Seek>(&self, stream: R) -> Result<Image, ImageError> {
        let mut reader = StreamReader::new(stream)?;
        self.decode(&mut reader)
    }

    fn limits(&self) -> Limits {
        self.limits.cloned().unwrap_or_default()
    }

    fn raw_codec(&self) -> Result<RawCodec, ImageError> {
        let (width, height, spec) = self.raw_layout.ok_or(ImageError::UnsupportedOperation {
            detail: "raw decode needs a layout; use with_raw_layout",
        })?;
        Ok(RawCodec::new(width, height, spec).with_limits(self.limits()))
    }
}
