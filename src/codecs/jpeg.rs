//! JPEG codec adapter using turbojpeg.
//!
//! Only three-component (YCbCr or RGB) files decode; grayscale and CMYK
//! input is rejected. Decoding produces 8-bit RGB, which is then converted
//! to the requested spec. The encoder takes 8-bit RGB only.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use std::io::{Read, Write};

use log::debug;

use crate::codecs::{ImageDecoder, ImageEncoder, into_spec, read_full};
use crate::color::ColorSpec;
use crate::config::CodecConfig;
use crate::error::ImageError;
use crate::format::ImageFormat;
use crate::image::{Image, ImageRef};
use crate::io::{DataReader, DataWriter, ReadAdapter, WriteAdapter};
use crate::limits::Limits;

const SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const DEFAULT_QUALITY: u8 = 75;

/// JPEG decoder and encoder.
#[derive(Clone, Debug)]
pub struct JpegCodec {
    limits: Limits,
    quality: u8,
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            quality: DEFAULT_QUALITY,
        }
    }
}

impl JpegCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set resource limits for decoding.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Apply the JPEG fields of `config` to encoding.
    pub fn with_config(mut self, config: &CodecConfig) -> Self {
        self.quality = config.jpeg_quality.unwrap_or(DEFAULT_QUALITY);
        self
    }
}

fn codec_error(e: turbojpeg::Error) -> ImageError {
    ImageError::from_codec(ImageFormat::Jpeg, e)
}

fn dimension(value: usize) -> Result<u32, ImageError> {
    u32::try_from(value).map_err(|_| ImageError::InvalidInput(format!("JPEG dimension {value} too large")))
}

impl ImageDecoder for JpegCodec {
    fn decode(&self, reader: &mut dyn DataReader, spec: ColorSpec) -> Result<Image, ImageError> {
        let mut signature = [0u8; 3];
        if read_full(reader, &mut signature).is_err() || signature != SIGNATURE {
            return Err(ImageError::InvalidInput("not a JPEG".to_string()));
        }
        reader.seek(-(SIGNATURE.len() as i64))?;

        let mut data = Vec::new();
        ReadAdapter::new(reader).read_to_end(&mut data)?;

        let mut decompressor = turbojpeg::Decompressor::new().map_err(codec_error)?;
        let header = decompressor.read_header(&data).map_err(codec_error)?;
        match &header.colorspace {
            turbojpeg::Colorspace::YCbCr | turbojpeg::Colorspace::RGB => {}
            other => {
                return Err(ImageError::InvalidInput(format!(
                    "unsupported JPEG color space {other:?}: expected 3 components"
                )));
            }
        }

        let width = dimension(header.width)?;
        let height = dimension(header.height)?;
        debug!("jpeg decode {}x{} {:?} -> {}", width, height, header.colorspace, spec);

        self.limits.check_image(width, height, ColorSpec::RGB8)?;
        let mut image = Image::try_with_spec(width, height, ColorSpec::RGB8)?;
        let pitch = image.stride();
        let output = turbojpeg::Image {
            pixels: image.data_mut(),
            width: header.width,
            pitch,
            height: header.height,
            format: turbojpeg::PixelFormat::RGB,
        };
        decompressor.decompress(&data, output).map_err(codec_error)?;

        into_spec(image, spec)
    }
}

impl ImageEncoder for JpegCodec {
    /// Encode 8-bit RGB pixels with 4:2:0 chroma subsampling.
    fn encode(&self, image: ImageRef<'_>, writer: &mut dyn DataWriter) -> Result<(), ImageError> {
        let spec = image.color_spec();
        if spec != ColorSpec::RGB8 {
            return Err(ImageError::UnsupportedLayout {
                format: ImageFormat::Jpeg,
                spec,
            });
        }
        if image.is_empty() {
            return Err(ImageError::InvalidInput("cannot encode an empty image as JPEG".to_string()));
        }
        let quality = self.quality.clamp(1, 100);
        debug!("jpeg encode {}x{} quality {}", image.width(), image.height(), quality);

        let source = turbojpeg::Image {
            pixels: image.data(),
            width: image.width() as usize,
            pitch: image.stride(),
            height: image.height() as usize,
            format: turbojpeg::PixelFormat::RGB,
        };
        let jpeg = turbojpeg::compress(source, i32::from(quality), turbojpeg::Subsamp::Sub2x2)
            .map_err(codec_error)?;

        let mut sink = WriteAdapter::new(writer);
        sink.write_all(&jpeg)?;
        sink.flush()?;
        Ok(())
    }
}
