//! Resource limits for decoding.

use alloc::format;

use crate::color::ColorSpec;
use crate::error::ImageError;

/// Resource limits applied by decoders after the header is read and before
/// pixel memory is allocated.
///
/// All limits are optional; the default imposes none.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    /// Maximum image width in pixels.
    pub max_width: Option<u64>,
    /// Maximum image height in pixels.
    pub max_height: Option<u64>,
    /// Maximum total pixels (width × height).
    pub max_pixels: Option<u64>,
    /// Maximum size of a single pixel buffer in bytes.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Create a new Limits with no restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_max_dimensions(mut self, width: u64, height: u64) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    pub fn with_max_pixels(mut self, pixels: u64) -> Self {
        self.max_pixels = Some(pixels);
        self
    }

    pub fn with_max_memory(mut self, bytes: u64) -> Self {
        self.max_memory_bytes = Some(bytes);
        self
    }

    /// Check if dimensions are within limits.
    ///
    /// Returns `Err` with a description if any limit is exceeded.
    pub fn check_dimensions(&self, width: u64, height: u64) -> Result<(), &'static str> {
        if let Some(max_width) = self.max_width {
            if width > max_width {
                return Err("width exceeds limit");
            }
        }

        if let Some(max_height) = self.max_height {
            if height > max_height {
                return Err("height exceeds limit");
            }
        }

        if let Some(max_pixels) = self.max_pixels {
            let pixels = width.saturating_mul(height);
            if pixels > max_pixels {
                return Err("pixel count exceeds limit");
            }
        }

        Ok(())
    }

    /// Check if a memory allocation is within limits.
    pub fn check_memory(&self, bytes: u64) -> Result<(), &'static str> {
        if let Some(max_memory) = self.max_memory_bytes {
            if bytes > max_memory {
                return Err("memory allocation exceeds limit");
            }
        }
        Ok(())
    }

    /// Check dimensions and the buffer an image of `spec` would need.
    pub fn check_image(&self, width: u32, height: u32, spec: ColorSpec) -> Result<(), ImageError> {
        let exceeded = |what: &str| ImageError::LimitExceeded(format!("{width}x{height} {spec}: {what}"));

        self.check_dimensions(u64::from(width), u64::from(height))
            .map_err(exceeded)?;
        let bytes = (u64::from(width) * u64::from(height)).saturating_mul(spec.bytes_per_pixel() as u64);
        self.check_memory(bytes).map_err(exceeded)
    }
}
