//! Typed pixel interop with the `rgb` and `imgref` crates.
//!
//! Only 8-bit layouts map onto typed pixels; 16-bit buffers have no
//! alignment guarantee inside [`Image`].

use alloc::vec::Vec;

pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::{Rgb, Rgba};

use crate::color::ColorSpec;
use crate::error::ImageError;
use crate::image::Image;

fn dimension(v: usize) -> Result<u32, ImageError> {
    u32::try_from(v).map_err(|_| ImageError::InvalidInput(alloc::format!("dimension {v} exceeds u32")))
}

macro_rules! typed_interop {
    ($pixel:ty, $spec:expr, $from_ref:ident, $as_ref:ident) => {
        impl Image {
            #[doc = concat!("Copy a (possibly strided) `ImgRef<", stringify!($pixel), ">` into a tightly packed image.")]
            pub fn $from_ref(img: ImgRef<'_, $pixel>) -> Result<Image, ImageError> {
                let width = dimension(img.width())?;
                let height = dimension(img.height())?;
                let mut data: Vec<u8> = Vec::with_capacity(img.width() * img.height() * $spec.bytes_per_pixel());
                for row in img.rows() {
                    data.extend_from_slice(bytemuck::cast_slice(row));
                }
                Image::from_vec(width, height, $spec, data)
            }

            #[doc = concat!("Borrow as `ImgRef<", stringify!($pixel), ">` when the color spec matches.")]
            pub fn $as_ref(&self) -> Option<ImgRef<'_, $pixel>> {
                if self.color_spec() != $spec || !self.is_valid() {
                    return None;
                }
                let pixels: &[$pixel] = bytemuck::cast_slice(self.data());
                Some(Img::new(pixels, self.width() as usize, self.height() as usize))
            }
        }

        impl TryFrom<ImgVec<$pixel>> for Image {
            type Error = ImageError;

            fn try_from(img: ImgVec<$pixel>) -> Result<Self, Self::Error> {
                Image::$from_ref(img.as_ref())
            }
        }
    };
}

typed_interop!(Rgb<u8>, ColorSpec::RGB8, from_rgb8, as_rgb8);
typed_interop!(Rgba<u8>, ColorSpec::RGBA8, from_rgba8, as_rgba8);

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn from_imgvec_rgb8() {
        let img = ImgVec::new(vec![Rgb::new(1u8, 2, 3), Rgb::new(4, 5, 6)], 2, 1);
        let image = Image::try_from(img).unwrap();
        assert_eq!(image.color_spec(), ColorSpec::RGB8);
        assert_eq!(image.data(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn strided_source_is_packed() {
        // 2x2 view over a buffer with stride 3
        let buf = vec![Rgba::new(1u8, 1, 1, 1), Rgba::new(2, 2, 2, 2), Rgba::new(0, 0, 0, 0),
                       Rgba::new(3, 3, 3, 3), Rgba::new(4, 4, 4, 4), Rgba::new(0, 0, 0, 0)];
        let img = Img::new_stride(buf.as_slice(), 2, 2, 3);
        let image = Image::from_rgba8(img).unwrap();
        assert_eq!(image.data(), [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn as_typed_checks_spec() {
        let image = Image::from_vec(1, 1, ColorSpec::RGBA8, vec![9, 8, 7, 6]).unwrap();
        let view = image.as_rgba8().unwrap();
        assert_eq!(view.buf()[0], Rgba::new(9, 8, 7, 6));
        assert!(image.as_rgb8().is_none());
        assert!(Image::with_spec(0, 0, ColorSpec::RGB8).as_rgb8().is_none());
    }

    #[test]
    fn converted_typed_round_trip() {
        let img = ImgVec::new(vec![Rgb::new(10u8, 20, 30); 4], 2, 2);
        let rgba = Image::try_from(img).unwrap().converted_to(ColorSpec::RGBA8).unwrap();
        let view = rgba.as_rgba8().unwrap();
        assert!(view.pixels().all(|p| p == Rgba::new(10, 20, 30, 255)));
    }
}
