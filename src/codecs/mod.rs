//! Codec adapters.
//!
//! Each adapter reads and writes only through [`DataReader`] /
//! [`DataWriter`] and hands pixel layout changes to
//! [`Image::converted_to`] instead of reshaping buffers itself.

use alloc::format;

use crate::color::ColorSpec;
use crate::error::ImageError;
use crate::image::{Image, ImageRef};
use crate::io::{DataReader, DataWriter};

pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;
pub mod raw;

pub use self::gif::GifCodec;
#[cfg(feature = "jpeg")]
pub use self::jpeg::JpegCodec;
#[cfg(feature = "png")]
pub use self::png::PngCodec;
pub use self::raw::RawCodec;

/// Decodes one image from a byte source.
pub trait ImageDecoder {
    /// Decode into an image with the requested `spec`.
    ///
    /// The reader's position afterwards is unspecified.
    fn decode(&self, reader: &mut dyn DataReader, spec: ColorSpec) -> Result<Image, ImageError>;
}

/// Encodes one image into a byte sink.
pub trait ImageEncoder {
    fn encode(&self, image: ImageRef<'_>, writer: &mut dyn DataWriter) -> Result<(), ImageError>;
}

/// Fill `buf` from `reader`, failing with `InvalidInput` on a short source.
pub(crate) fn read_full(reader: &mut dyn DataReader, buf: &mut [u8]) -> Result<(), ImageError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => {
                return Err(ImageError::InvalidInput(format!(
                    "truncated input: expected {} bytes, got {}",
                    buf.len(),
                    filled
                )));
            }
            n => filled += n,
        }
    }
    Ok(())
}

/// Write all of `buf`, failing with `Io(WriteZero)` when the sink fills up.
pub(crate) fn write_full(writer: &mut dyn DataWriter, mut buf: &[u8]) -> Result<(), ImageError> {
    while !buf.is_empty() {
        match writer.write(buf)? {
            0 => return Err(std::io::Error::from(std::io::ErrorKind::WriteZero).into()),
            n => buf = &buf[n..],
        }
    }
    Ok(())
}

/// Convert `image` to `spec` without cloning when it already matches.
pub(crate) fn into_spec(image: Image, spec: ColorSpec) -> Result<Image, ImageError> {
    if image.color_spec() == spec {
        Ok(image)
    } else {
        image.converted_to(spec)
    }
}
