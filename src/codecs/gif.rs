//! GIF placeholder. Neither direction is implemented.

use crate::codecs::{ImageDecoder, ImageEncoder};
use crate::color::ColorSpec;
use crate::error::ImageError;
use crate::image::{Image, ImageRef};
use crate::io::{DataReader, DataWriter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GifCodec;

impl ImageDecoder for GifCodec {
    fn decode(&self, _reader: &mut dyn DataReader, _spec: ColorSpec) -> Result<Image, ImageError> {
        Err(ImageError::NotImplemented("GIF decode"))
    }
}

impl ImageEncoder for GifCodec {
    fn encode(&self, _image: ImageRef<'_>, _writer: &mut dyn DataWriter) -> Result<(), ImageError> {
        Err(ImageError::NotImplemented("GIF encode"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryReader;

    #[test]
    fn both_directions_unimplemented() {
        let data = *b"GIF89a";
        let mut reader = MemoryReader::new(&data);
        assert!(matches!(
            GifCodec.decode(&mut reader, ColorSpec::RGBA8),
            Err(ImageError::NotImplemented(_))
        ));
        // Nothing consumed.
        assert_eq!(reader.tell(), 0);

        let image = Image::new(1, 1);
        let mut out = alloc::vec::Vec::new();
        assert!(matches!(
            GifCodec.encode(image.as_view(), &mut out),
            Err(ImageError::NotImplemented(_))
        ));
        assert!(out.is_empty());
    }
}
