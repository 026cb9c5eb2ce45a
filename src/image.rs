//! Owned raster image and borrowed views.
//!
//! Pixel buffers are row-major, top-to-bottom, tightly packed (stride is
//! `width × bytes_per_pixel`, no row padding), with interleaved channels in
//! RGB/RGBA order. 16-bit channels are native-endian.
//!
//! # Buffer ownership
//!
//! An [`Image`] either allocates its buffer or adopts one through
//! [`Image::from_vec`]; both end with the image as sole owner. [`ImageRef`]
//! is the non-owning counterpart for pixel data that stays with the caller.
//!
//! # Sharing
//!
//! `Clone` copies the whole buffer eagerly. Replacing an image's buffer
//! ([`Image::take`], assignment) needs `&mut Image` or ownership, so it
//! cannot overlap a clone or a borrow of [`Image::data`] on the same
//! instance. Writes through [`Image::data_mut`] are likewise exclusive.
//! `Image` is `Send + Sync`.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use log::debug;

use crate::color::{ChannelDepth, ColorSpec, PixelFormat};
use crate::convert;
use crate::error::ImageError;

/// How [`Image::composite`] combines pixels.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeOperation {
    /// Replace destination pixels with source pixels.
    #[default]
    Copy,
}

/// Raster image owning a contiguous pixel buffer.
///
/// An image is *valid* iff it holds a buffer. Images whose buffer size
/// would be zero (zero width or height) are constructed invalid and
/// allocate nothing; they still report the dimensions they were given.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    spec: ColorSpec,
    data: Option<Box<[u8]>>,
}

impl Default for Image {
    /// Invalid image: zero dimensions, RGBA8, no buffer.
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            spec: ColorSpec::RGBA8,
            data: None,
        }
    }
}

impl Image {
    /// Allocate a zero-filled 8-bit RGB image.
    ///
    /// # Panics
    ///
    /// Panics if the buffer size overflows `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_spec(width, height, ColorSpec::RGB8)
    }

    /// Allocate a zero-filled image with the given format and depth.
    ///
    /// # Panics
    ///
    /// Panics if the buffer size overflows `usize`. Use
    /// [`try_with_spec`](Self::try_with_spec) for untrusted dimensions.
    pub fn with_spec(width: u32, height: u32, spec: ColorSpec) -> Self {
        Self::try_with_spec(width, height, spec)
            .unwrap_or_else(|e| panic!("Image::with_spec({width}, {height}, {spec}): {e}"))
    }

    /// Fallible form of [`with_spec`](Self::with_spec).
    pub fn try_with_spec(width: u32, height: u32, spec: ColorSpec) -> Result<Self, ImageError> {
        let size = checked_size(width, height, spec)?;
        Ok(Self::zeroed(width, height, spec, size))
    }

    /// Zero-filled image of `size` bytes. `size` must already equal
    /// `width × height × bytes_per_pixel`, computed without overflow.
    fn zeroed(width: u32, height: u32, spec: ColorSpec, size: usize) -> Self {
        debug_assert_eq!(spec.buffer_size(width, height), Some(size));
        Self {
            width,
            height,
            spec,
            data: (size > 0).then(|| vec![0u8; size].into_boxed_slice()),
        }
    }

    /// Take ownership of `data` as the pixel buffer.
    ///
    /// `data.len()` must equal `width × height × spec.bytes_per_pixel()`.
    /// When that size is zero the (empty) vec is dropped and the image is
    /// invalid.
    ///
    /// # Errors
    ///
    /// [`ImageError::InvalidInput`] on a length mismatch or size overflow.
    pub fn from_vec(
        width: u32,
        height: u32,
        spec: ColorSpec,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let size = checked_size(width, height, spec)?;
        if data.len() != size {
            return Err(ImageError::InvalidInput(alloc::format!(
                "{}x{} {} image needs {} bytes, got {}",
                width,
                height,
                spec,
                size,
                data.len()
            )));
        }
        let data = (size > 0).then(|| data.into_boxed_slice());
        Ok(Self {
            width,
            height,
            spec,
            data,
        })
    }

    /// Give up the pixel buffer. Empty for an invalid image.
    pub fn into_vec(self) -> Vec<u8> {
        self.data.map(Vec::from).unwrap_or_default()
    }

    /// Move the contents out, leaving `self` invalid with zero dimensions.
    /// The color spec is left in place.
    pub fn take(&mut self) -> Image {
        Image {
            width: core::mem::take(&mut self.width),
            height: core::mem::take(&mut self.height),
            spec: self.spec,
            data: self.data.take(),
        }
    }

    /// Whether the image holds a pixel buffer.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.data.is_some()
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn color_spec(&self) -> ColorSpec {
        self.spec
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.spec.format()
    }

    #[inline]
    pub fn channel_depth(&self) -> ChannelDepth {
        self.spec.channel_depth()
    }

    /// Byte stride between row starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.spec.bytes_per_pixel()
    }

    /// `width × height × bytes_per_pixel`. Zero iff the image was created
    /// invalid.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.stride() * self.height as usize
    }

    /// Pixel buffer, empty when invalid.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Mutable pixel buffer, empty when invalid.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    /// Row `y`, or `None` when out of range or invalid.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        self.as_view().row(y)
    }

    /// Borrow as a non-owning view.
    pub fn as_view(&self) -> ImageRef<'_> {
        ImageRef {
            width: self.width,
            height: self.height,
            spec: self.spec,
            data: self.data(),
        }
    }

    /// Composite `image` onto `self` at `(x, y)`.
    ///
    /// Blending is not provided by this crate.
    ///
    /// # Errors
    ///
    /// Always [`ImageError::NotImplemented`].
    pub fn composite(
        &mut self,
        _x: i32,
        _y: i32,
        _image: &Image,
        _operation: CompositeOperation,
    ) -> Result<&mut Self, ImageError> {
        Err(ImageError::NotImplemented("composite"))
    }

    /// Copy the sub-rectangle at `(x, y)` of size `width × height` into a
    /// new image.
    ///
    /// The rectangle is clamped to this image: `width` shrinks to
    /// `self.width() - x` when it would run past the right edge (likewise
    /// for `height`). An origin at or past the edge clamps to zero, giving
    /// an invalid image.
    pub fn cropped(&self, x: u32, y: u32, width: u32, height: u32) -> Image {
        let width = width.min(self.width.saturating_sub(x));
        let height = height.min(self.height.saturating_sub(y));

        let bpp = self.spec.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        let mut out = Image::zeroed(width, height, self.spec, row_bytes * height as usize);
        if let (Some(src), Some(dst)) = (self.data.as_deref(), out.data.as_deref_mut()) {
            let src_stride = self.stride();
            let x_offset = x as usize * bpp;
            for (i, dst_row) in dst.chunks_exact_mut(row_bytes).enumerate() {
                let start = (y as usize + i) * src_stride + x_offset;
                dst_row.copy_from_slice(&src[start..start + row_bytes]);
            }
        }
        out
    }

    /// Convert to another format/depth, producing a new image.
    ///
    /// Converting to the current spec still clones the buffer.
    ///
    /// # Errors
    ///
    /// [`ImageError::UnsupportedConversion`] when the pair has no transform
    /// (see [`convert::supported_pairs`]).
    pub fn converted_to(&self, spec: ColorSpec) -> Result<Image, ImageError> {
        if spec == self.spec {
            return Ok(self.clone());
        }

        let convert = convert::lookup(self.spec, spec).ok_or(ImageError::UnsupportedConversion {
            from: self.spec,
            to: spec,
        })?;

        debug!(
            "converting {}x{} image {} -> {}",
            self.width, self.height, self.spec, spec
        );

        let mut out = Image::try_with_spec(self.width, self.height, spec)?;
        let pixels = self.width as usize * self.height as usize;
        if let (Some(src), Some(dst)) = (self.data.as_deref(), out.data.as_deref_mut()) {
            convert(src, dst, pixels);
        }
        Ok(out)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({}x{}, {}", self.width, self.height, self.spec)?;
        if !self.is_valid() {
            write!(f, ", invalid")?;
        }
        write!(f, ")")
    }
}

fn checked_size(width: u32, height: u32, spec: ColorSpec) -> Result<usize, ImageError> {
    spec.buffer_size(width, height).ok_or_else(|| {
        ImageError::InvalidInput(alloc::format!(
            "{}x{} {} image size overflows",
            width,
            height,
            spec
        ))
    })
}

// ---------------------------------------------------------------------------
// ImageRef
// ---------------------------------------------------------------------------

/// Borrowed pixel data with the same layout rules as [`Image`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ImageRef<'a> {
    width: u32,
    height: u32,
    spec: ColorSpec,
    data: &'a [u8],
}

impl<'a> ImageRef<'a> {
    /// Wrap a caller-owned buffer without copying.
    ///
    /// # Errors
    ///
    /// [`ImageError::InvalidInput`] when `data.len()` differs from the size
    /// implied by the dimensions and spec.
    pub fn new(
        width: u32,
        height: u32,
        spec: ColorSpec,
        data: &'a [u8],
    ) -> Result<Self, ImageError> {
        let size = checked_size(width, height, spec)?;
        if data.len() != size {
            return Err(ImageError::InvalidInput(alloc::format!(
                "{}x{} {} view needs {} bytes, got {}",
                width,
                height,
                spec,
                size,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            spec,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn color_spec(&self) -> ColorSpec {
        self.spec
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.spec.bytes_per_pixel()
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `y`, or `None` when out of range.
    pub fn row(&self, y: u32) -> Option<&'a [u8]> {
        if y >= self.height || self.data.is_empty() {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    /// Copy into an owned [`Image`].
    pub fn to_image(&self) -> Image {
        let data = (!self.data.is_empty()).then(|| Box::<[u8]>::from(self.data));
        Image {
            width: self.width,
            height: self.height,
            spec: self.spec,
            data,
        }
    }
}

impl<'a> From<&'a Image> for ImageRef<'a> {
    fn from(image: &'a Image) -> Self {
        image.as_view()
    }
}

impl fmt::Debug for ImageRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageRef({}x{}, {})", self.width, self.height, self.spec)
    }
}
