//! PNG codec adapter using png crate.
//!
//! Decoding expands palette, low-bit gray, and `tRNS` transparency to
//! 8-bit channels (plus alpha). Gray output is widened to RGB unless a
//! monochromatic image was requested. The wire format stores 16-bit
//! samples big-endian; images hold them in native order.

use alloc::format;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use std::io::{BufReader, Write};

use log::debug;

use crate::codecs::{ImageDecoder, ImageEncoder, into_spec, read_full};
use crate::color::{ChannelDepth, ColorSpec, PixelFormat};
use crate::config::CodecConfig;
use crate::error::ImageError;
use crate::format::ImageFormat;
use crate::image::{Image, ImageRef};
use crate::io::{DataReader, DataWriter, ReadAdapter, WriteAdapter};
use crate::limits::Limits;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];
const SOFTWARE: &str = "zenraster";

/// PNG decoder and encoder.
#[derive(Clone, Debug, Default)]
pub struct PngCodec {
    limits: Limits,
    compression: Option<png::Compression>,
    filter: Option<png::Filter>,
}

impl PngCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set resource limits for decoding.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Apply the PNG fields of `config` to encoding.
    pub fn with_config(mut self, config: &CodecConfig) -> Self {
        self.compression = config.png_compression;
        self.filter = config.png_filter;
        self
    }
}

fn decoding_error(e: png::DecodingError) -> ImageError {
    match e {
        png::DecodingError::IoError(io) => ImageError::Io(io),
        other => ImageError::from_codec(ImageFormat::Png, other),
    }
}

fn encoding_error(e: png::EncodingError) -> ImageError {
    match e {
        png::EncodingError::IoError(io) => ImageError::Io(io),
        other => ImageError::from_codec(ImageFormat::Png, other),
    }
}

/// Layout the decoded samples are repacked into, and which source channel
/// feeds each destination channel.
fn target_layout(
    color: png::ColorType,
    requested: PixelFormat,
) -> Result<(PixelFormat, &'static [usize]), ImageError> {
    use png::ColorType;

    Ok(match (color, requested) {
        (ColorType::Grayscale | ColorType::GrayscaleAlpha, PixelFormat::Monochromatic) => {
            (PixelFormat::Monochromatic, &[0])
        }
        (ColorType::Grayscale, _) => (PixelFormat::Rgb, &[0, 0, 0]),
        (ColorType::GrayscaleAlpha, _) => (PixelFormat::Rgba, &[0, 0, 0, 1]),
        (ColorType::Rgb, _) => (PixelFormat::Rgb, &[0, 1, 2]),
        (ColorType::Rgba, _) => (PixelFormat::Rgba, &[0, 1, 2, 3]),
        (ColorType::Indexed, _) => {
            return Err(ImageError::InvalidInput("PNG palette was not expanded".to_string()));
        }
    })
}

impl ImageDecoder for PngCodec {
    fn decode(&self, reader: &mut dyn DataReader, spec: ColorSpec) -> Result<Image, ImageError> {
        let mut signature = [0u8; 8];
        if read_full(reader, &mut signature).is_err() || signature != SIGNATURE {
            return Err(ImageError::InvalidInput("not a PNG".to_string()));
        }
        reader.seek(-(SIGNATURE.len() as i64))?;

        let mut transformations = png::Transformations::EXPAND;
        if spec.channel_depth() == ChannelDepth::Bits8 {
            transformations |= png::Transformations::STRIP_16;
        }

        let mut decoder = png::Decoder::new(BufReader::new(ReadAdapter::new(reader)));
        decoder.set_transformations(transformations);
        let mut png_reader = decoder.read_info().map_err(decoding_error)?;

        let (width, height) = {
            let info = png_reader.info();
            (info.width, info.height)
        };
        let (color, bit_depth) = png_reader.output_color_type();
        let depth = match bit_depth {
            png::BitDepth::Eight => ChannelDepth::Bits8,
            png::BitDepth::Sixteen => ChannelDepth::Bits16,
            other => {
                return Err(ImageError::InvalidInput(format!(
                    "unexpected PNG output bit depth {other:?}"
                )));
            }
        };
        let (format, channel_map) = target_layout(color, spec.format())?;
        let decoded = ColorSpec::new(format, depth);
        debug!(
            "png decode {}x{} {:?}/{:?} as {} -> {}",
            width, height, color, bit_depth, decoded, spec
        );

        self.limits.check_image(width, height, decoded)?;
        let size = decoded
            .buffer_size(width, height)
            .ok_or_else(|| ImageError::LimitExceeded(format!("{width}x{height} {decoded}: size overflows")))?;

        let buffer_size = png_reader
            .output_buffer_size()
            .ok_or_else(|| ImageError::InvalidInput("cannot determine PNG output buffer size".to_string()))?;
        let mut raw = vec![0u8; buffer_size];
        let frame = png_reader.next_frame(&mut raw).map_err(decoding_error)?;
        if frame.line_size == 0 {
            return Err(ImageError::InvalidInput("PNG has zero-width rows".to_string()));
        }

        let sample = depth.bytes();
        let src_pixel = color.samples() * sample;
        let src_row = width as usize * src_pixel;
        let mut pixels = Vec::with_capacity(size);
        for row in raw.chunks_exact(frame.line_size).take(height as usize) {
            for px in row[..src_row].chunks_exact(src_pixel) {
                for &c in channel_map {
                    let s = &px[c * sample..(c + 1) * sample];
                    match depth {
                        ChannelDepth::Bits8 => pixels.push(s[0]),
                        ChannelDepth::Bits16 => {
                            pixels.extend_from_slice(&u16::from_be_bytes([s[0], s[1]]).to_ne_bytes())
                        }
                    }
                }
            }
        }

        let image = Image::from_vec(width, height, decoded, pixels)?;
        into_spec(image, spec)
    }
}

impl ImageEncoder for PngCodec {
    /// Encode monochromatic, RGB or RGBA pixels at 8 or 16 bits.
    fn encode(&self, image: ImageRef<'_>, writer: &mut dyn DataWriter) -> Result<(), ImageError> {
        if image.is_empty() {
            return Err(ImageError::InvalidInput("cannot encode an empty image as PNG".to_string()));
        }
        let spec = image.color_spec();
        debug!("png encode {}x{} {}", image.width(), image.height(), spec);

        let color = match spec.format() {
            PixelFormat::Monochromatic => png::ColorType::Grayscale,
            PixelFormat::Rgb => png::ColorType::Rgb,
            PixelFormat::Rgba => png::ColorType::Rgba,
        };
        let depth = match spec.channel_depth() {
            ChannelDepth::Bits8 => png::BitDepth::Eight,
            ChannelDepth::Bits16 => png::BitDepth::Sixteen,
        };

        let mut sink = WriteAdapter::new(writer);
        let mut encoder = png::Encoder::new(&mut sink, image.width(), image.height());
        encoder.set_color(color);
        encoder.set_depth(depth);
        if let Some(compression) = self.compression {
            encoder.set_compression(compression);
        }
        if let Some(filter) = self.filter {
            encoder.set_filter(filter);
        }
        encoder
            .add_text_chunk("Software".to_string(), SOFTWARE.to_string())
            .map_err(encoding_error)?;

        let mut png_writer = encoder.write_header().map_err(encoding_error)?;
        match spec.channel_depth() {
            ChannelDepth::Bits8 => png_writer.write_image_data(image.data()),
            ChannelDepth::Bits16 => {
                let big_endian: Vec<u8> = image
                    .data()
                    .chunks_exact(2)
                    .flat_map(|s| u16::from_ne_bytes([s[0], s[1]]).to_be_bytes())
                    .collect();
                png_writer.write_image_data(&big_endian)
            }
        }
        .map_err(encoding_error)?;
        png_writer.finish().map_err(encoding_error)?;

        sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{MemoryReader, MemoryWriter, StreamReader};
    use std::io::Cursor;

    fn encode(image: &Image) -> Vec<u8> {
        let mut out = Vec::new();
        PngCodec::new().encode(image.as_view(), &mut out).unwrap();
        out
    }

    fn decode(data: &[u8], spec: ColorSpec) -> Result<Image, ImageError> {
        PngCodec::new().decode(&mut MemoryReader::new(data), spec)
    }

    /// Encode raw samples with the png crate directly.
    fn png_bytes(width: u32, height: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
        png_bytes_with(width, height, color, depth, data, None)
    }

    fn png_bytes_with(
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        data: &[u8],
        palette: Option<Vec<u8>>,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if let Some(palette) = palette {
                encoder.set_palette(palette);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    fn u16s(image: &Image) -> Vec<u16> {
        image
            .data()
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect()
    }

    #[test]
    fn rgb8_round_trip() {
        let image = Image::from_vec(2, 2, ColorSpec::RGB8, (0..12).collect()).unwrap();
        let decoded = decode(&encode(&image), ColorSpec::RGB8).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn rgba16_round_trip_keeps_native_values() {
        let values: [u16; 8] = [0, 1, 256, 65535, 51200, 2560, 1280, 42];
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        let image = Image::from_vec(2, 1, ColorSpec::RGBA16, data).unwrap();
        let decoded = decode(&encode(&image), ColorSpec::RGBA16).unwrap();
        assert_eq!(u16s(&decoded), values);
    }

    #[test]
    fn sixteen_bit_wire_is_big_endian() {
        let image = Image::from_vec(1, 1, ColorSpec::GRAY16, 0x1234u16.to_ne_bytes().to_vec()).unwrap();
        let bytes = encode(&image);
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0u8; reader.output_buffer_size().unwrap()];
        reader.next_frame(&mut buf).unwrap();
        assert_eq!(buf[..2], [0x12, 0x34]);
    }

    #[test]
    fn sixteen_bit_strips_when_eight_requested() {
        let data: Vec<u8> = [0xABCDu16, 0x0102, 0xFF00].iter().flat_map(|v| v.to_be_bytes()).collect();
        let bytes = png_bytes(1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &data);
        let decoded = decode(&bytes, ColorSpec::RGB8).unwrap();
        assert_eq!(decoded.data(), [0xAB, 0x01, 0xFF]);
    }

    #[test]
    fn gray_expands_to_rgb() {
        let bytes = png_bytes(2, 1, png::ColorType::Grayscale, png::BitDepth::Eight, &[7, 9]);
        let decoded = decode(&bytes, ColorSpec::RGB8).unwrap();
        assert_eq!(decoded.data(), [7, 7, 7, 9, 9, 9]);

        let rgba = decode(&bytes, ColorSpec::RGBA8).unwrap();
        assert_eq!(rgba.data(), [7, 7, 7, 255, 9, 9, 9, 255]);
    }

    #[test]
    fn gray_stays_gray_when_requested() {
        let image = Image::from_vec(3, 1, ColorSpec::GRAY8, vec![1, 2, 3]).unwrap();
        let decoded = decode(&encode(&image), ColorSpec::GRAY8).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn gray_alpha_expands_to_rgba() {
        let bytes = png_bytes(1, 1, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, &[50, 128]);
        let decoded = decode(&bytes, ColorSpec::RGBA8).unwrap();
        assert_eq!(decoded.data(), [50, 50, 50, 128]);
    }

    #[test]
    fn low_bit_gray_is_expanded() {
        // 1-bit gray, pixels 1,0 packed MSB first
        let bytes = png_bytes(2, 1, png::ColorType::Grayscale, png::BitDepth::One, &[0b1000_0000]);
        let decoded = decode(&bytes, ColorSpec::GRAY8).unwrap();
        assert_eq!(decoded.data(), [255, 0]);
    }

    #[test]
    fn palette_is_expanded() {
        let palette = vec![10, 20, 30, 40, 50, 60];
        let bytes = png_bytes_with(2, 1, png::ColorType::Indexed, png::BitDepth::Eight, &[1, 0], Some(palette));
        let decoded = decode(&bytes, ColorSpec::RGB8).unwrap();
        assert_eq!(decoded.data(), [40, 50, 60, 10, 20, 30]);
    }

    #[test]
    fn rgba_decoded_as_rgb_drops_alpha() {
        let bytes = png_bytes(1, 1, png::ColorType::Rgba, png::BitDepth::Eight, &[1, 2, 3, 4]);
        let decoded = decode(&bytes, ColorSpec::RGB8).unwrap();
        assert_eq!(decoded.data(), [1, 2, 3]);
    }

    #[test]
    fn rgb_requested_as_mono_is_unsupported() {
        let image = Image::from_vec(1, 1, ColorSpec::RGB8, vec![1, 2, 3]).unwrap();
        let err = decode(&encode(&image), ColorSpec::GRAY8).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedConversion { .. }));
    }

    #[test]
    fn signature_checked_first() {
        let err = decode(b"GIF89a\0\0\0\0", ColorSpec::RGB8).unwrap_err();
        assert!(matches!(err, ImageError::InvalidInput(ref m) if m == "not a PNG"));
        let err = decode(&SIGNATURE[..4], ColorSpec::RGB8).unwrap_err();
        assert!(matches!(err, ImageError::InvalidInput(_)));
    }

    #[test]
    fn truncated_stream_fails() {
        let image = Image::from_vec(4, 4, ColorSpec::RGB8, vec![3; 48]).unwrap();
        let bytes = encode(&image);
        assert!(decode(&bytes[..bytes.len() / 2], ColorSpec::RGB8).is_err());
    }

    #[test]
    fn limits_reject_large_images() {
        let image = Image::new(8, 8);
        let bytes = encode(&image);
        let err = PngCodec::new()
            .with_limits(Limits::none().with_max_pixels(32))
            .decode(&mut MemoryReader::new(&bytes), ColorSpec::RGB8)
            .unwrap_err();
        assert!(matches!(err, ImageError::LimitExceeded(_)));
    }

    #[test]
    fn decodes_from_stream_reader() {
        let image = Image::from_vec(1, 2, ColorSpec::RGBA8, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut reader = StreamReader::new(Cursor::new(encode(&image))).unwrap();
        let decoded = PngCodec::new().decode(&mut reader, ColorSpec::RGBA8).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn writes_software_text_chunk() {
        let bytes = encode(&Image::new(1, 1));
        let needle = b"Software\0zenraster";
        assert!(bytes.windows(needle.len()).any(|w| w == needle));
    }

    #[test]
    fn config_is_applied() {
        let image = Image::from_vec(4, 1, ColorSpec::RGB8, (0..12).collect()).unwrap();
        let config = CodecConfig::default()
            .with_png_compression(png::Compression::Fast)
            .with_png_filter(png::Filter::Paeth);
        let mut out = Vec::new();
        PngCodec::new().with_config(&config).encode(image.as_view(), &mut out).unwrap();
        assert_eq!(decode(&out, ColorSpec::RGB8).unwrap(), image);
    }

    #[test]
    fn empty_image_rejected() {
        let mut out = Vec::new();
        let err = PngCodec::new().encode(Image::default().as_view(), &mut out).unwrap_err();
        assert!(matches!(err, ImageError::InvalidInput(_)));
    }

    #[test]
    fn small_sink_reports_io_error() {
        let image = Image::new(16, 16);
        let mut buf = [0u8; 16];
        let mut writer = MemoryWriter::new(&mut buf);
        let err = PngCodec::new().encode(image.as_view(), &mut writer).unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }
}
