//! # zenraster
//!
//! In-memory raster images with pairwise pixel-format conversion and a
//! stream-agnostic reader/writer layer for codecs.
//!
//! An [`Image`] owns a tightly packed, row-major buffer described by a
//! [`ColorSpec`] (monochromatic, RGB or RGBA at 8 or 16 bits per channel).
//! [`Image::converted_to`] reshapes between the layouts listed by
//! [`convert::supported_pairs`]; [`Image::cropped`] copies out a rectangle.
//!
//! Codecs read through [`io::DataReader`] and write through
//! [`io::DataWriter`], so the same code runs over streams and memory. PNG is
//! enabled by default; JPEG (8-bit RGB, via libjpeg-turbo) is opt-in:
//!
//! ```toml
//! [dependencies]
//! zenraster = { version = "0.1", features = ["jpeg"] }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zenraster::{ColorSpec, DecodeRequest, EncodeRequest, ImageFormat};
//!
//! let data: &[u8] = &[]; // your PNG bytes
//! let image = DecodeRequest::new()
//!     .with_format(ImageFormat::Png)
//!     .with_color_spec(ColorSpec::RGB8)
//!     .decode_slice(data)?;
//!
//! let thumb = image.cropped(0, 0, 64, 64).converted_to(ColorSpec::RGBA16)?;
//! let png = EncodeRequest::new(ImageFormat::Png).encode_to_vec(&thumb)?;
//! # Ok::<(), zenraster::ImageError>(())
//! ```

#![forbid(unsafe_code)]

extern crate alloc;

pub mod codecs;
mod color;
pub mod config;
pub mod convert;
mod decode;
mod encode;
mod error;
mod format;
mod image;
pub mod io;
mod limits;
pub mod pixel;

pub use color::{ChannelDepth, ColorSpec, PixelFormat};
pub use config::CodecConfig;
pub use decode::DecodeRequest;
pub use encode::EncodeRequest;
pub use error::ImageError;
pub use format::ImageFormat;
pub use image::{CompositeOperation, Image, ImageRef};
pub use limits::Limits;
