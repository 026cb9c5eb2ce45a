//! Headerless pixel bytes.
//!
//! The byte stream is exactly an [`Image`] buffer: row-major, packed,
//! 16-bit channels in native byte order. Geometry is supplied by the caller.

use log::debug;

use crate::codecs::{ImageDecoder, ImageEncoder, into_spec, read_full, write_full};
use crate::color::ColorSpec;
use crate::error::ImageError;
use crate::image::{Image, ImageRef};
use crate::io::{DataReader, DataWriter};
use crate::limits::Limits;

/// Raw codec for a fixed geometry and stored layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawCodec {
    width: u32,
    height: u32,
    spec: ColorSpec,
    limits: Limits,
}

impl RawCodec {
    /// Codec for `width × height` pixels stored as `spec`.
    pub fn new(width: u32, height: u32, spec: ColorSpec) -> Self {
        Self {
            width,
            height,
            spec,
            limits: Limits::none(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Stored layout.
    pub fn color_spec(&self) -> ColorSpec {
        self.spec
    }

    /// Number of bytes one image occupies in the stream.
    pub fn byte_len(&self) -> Option<usize> {
        self.spec.buffer_size(self.width, self.height)
    }
}

impl ImageDecoder for RawCodec {
    /// Read exactly one stored image and convert it to `spec`.
    fn decode(&self, reader: &mut dyn DataReader, spec: ColorSpec) -> Result<Image, ImageError> {
        debug!(
            "raw decode {}x{} {} -> {}",
            self.width, self.height, self.spec, spec
        );
        self.limits.check_image(self.width, self.height, self.spec)?;

        let mut image = Image::try_with_spec(self.width, self.height, self.spec)?;
        read_full(reader, image.data_mut())?;
        into_spec(image, spec)
    }
}

impl ImageEncoder for RawCodec {
    /// Write `image` in the stored layout, converting first if needed.
    ///
    /// The image's own dimensions are written; the codec's geometry only
    /// applies to decoding.
    fn encode(&self, image: ImageRef<'_>, writer: &mut dyn DataWriter) -> Result<(), ImageError> {
        debug!(
            "raw encode {}x{} {} as {}",
            image.width(),
            image.height(),
            image.color_spec(),
            self.spec
        );
        if image.color_spec() == self.spec {
            write_full(writer, image.data())?;
        } else {
            let converted = image.to_image().converted_to(self.spec)?;
            write_full(writer, converted.data())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{MemoryReader, MemoryWriter};
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn decode_reads_exact_buffer() {
        let data: Vec<u8> = (0..12).collect();
        let mut reader = MemoryReader::new(&data);
        let codec = RawCodec::new(2, 2, ColorSpec::RGB8);
        let image = codec.decode(&mut reader, ColorSpec::RGB8).unwrap();
        assert_eq!(image.data(), data.as_slice());
        assert_eq!(reader.tell(), 12);
    }

    #[test]
    fn decode_converts_to_requested_spec() {
        let data = [200u8, 10, 5];
        let mut reader = MemoryReader::new(&data);
        let image = RawCodec::new(1, 1, ColorSpec::RGB8)
            .decode(&mut reader, ColorSpec::RGB16)
            .unwrap();
        let values: Vec<u16> = image
            .data()
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect();
        assert_eq!(values, [51200, 2560, 1280]);
    }

    #[test]
    fn short_input_is_invalid() {
        let data = [0u8; 5];
        let mut reader = MemoryReader::new(&data);
        let err = RawCodec::new(2, 1, ColorSpec::RGB8)
            .decode(&mut reader, ColorSpec::RGB8)
            .unwrap_err();
        assert!(matches!(err, ImageError::InvalidInput(_)));
    }

    #[test]
    fn limits_checked_before_reading() {
        let data = [0u8; 12];
        let mut reader = MemoryReader::new(&data);
        let err = RawCodec::new(2, 2, ColorSpec::RGB8)
            .with_limits(Limits::none().with_max_pixels(3))
            .decode(&mut reader, ColorSpec::RGB8)
            .unwrap_err();
        assert!(matches!(err, ImageError::LimitExceeded(_)));
        assert_eq!(reader.tell(), 0);
    }

    #[test]
    fn zero_sized_decodes_to_invalid_image() {
        let mut reader = MemoryReader::new(&[]);
        let image = RawCodec::new(0, 4, ColorSpec::RGBA8)
            .decode(&mut reader, ColorSpec::RGBA8)
            .unwrap();
        assert!(!image.is_valid());
    }

    #[test]
    fn encode_converts_to_stored_layout() {
        let image = Image::from_vec(2, 1, ColorSpec::RGBA8, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut out = Vec::new();
        RawCodec::new(2, 1, ColorSpec::RGB8)
            .encode(image.as_view(), &mut out)
            .unwrap();
        assert_eq!(out, [1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn encode_into_small_buffer_fails() {
        let image = Image::from_vec(2, 1, ColorSpec::RGB8, vec![9; 6]).unwrap();
        let mut buf = [0u8; 4];
        let mut writer = MemoryWriter::new(&mut buf);
        let err = RawCodec::new(2, 1, ColorSpec::RGB8)
            .encode(image.as_view(), &mut writer)
            .unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
        assert_eq!(writer.position(), 4);
    }
}
