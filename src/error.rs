//! Unified error type for image, conversion, and codec operations.

use alloc::boxed::Box;
use alloc::string::String;

use crate::color::ColorSpec;
use crate::format::ImageFormat;

/// Unified error type.
///
/// Every condition is reported to the caller immediately; nothing here is
/// transient, so retrying the same call with the same inputs fails the same
/// way.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImageError {
    /// Operation intentionally left unimplemented.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
    /// The request has no defined behavior for these inputs.
    #[error("unsupported operation: {detail}")]
    UnsupportedOperation { detail: &'static str },
    /// No conversion is defined for this ordered pair of specs.
    #[error("unsupported conversion from {from} to {to}")]
    UnsupportedConversion { from: ColorSpec, to: ColorSpec },
    /// Format tag recognized but its codec is not compiled in.
    #[error("format {0:?} not supported (codec not compiled in)")]
    UnsupportedFormat(ImageFormat),
    /// The codec cannot store pixels in this layout.
    #[error("format {format:?} cannot encode {spec} pixels")]
    UnsupportedLayout { format: ImageFormat, spec: ColorSpec },
    /// Input validation failed (bad signature, wrong buffer length, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Resource limit exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
    /// Transport error from a reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Underlying codec library error.
    #[error("codec error ({format:?}): {source}")]
    Codec {
        format: ImageFormat,
        #[source]
        source: Box<dyn core::error::Error + Send + Sync>,
    },
}

impl ImageError {
    /// Wrap a codec-specific error.
    pub fn from_codec<E>(format: ImageFormat, error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        ImageError::Codec {
            format,
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::error::Error;

    #[test]
    fn conversion_message_names_both_specs() {
        let err = ImageError::UnsupportedConversion {
            from: ColorSpec::GRAY8,
            to: ColorSpec::RGB8,
        };
        assert_eq!(err.to_string(), "unsupported conversion from Gray8 to RGB8");
    }

    #[test]
    fn layout_message_names_format_and_spec() {
        let err = ImageError::UnsupportedLayout {
            format: ImageFormat::Jpeg,
            spec: ColorSpec::RGBA8,
        };
        assert_eq!(err.to_string(), "format Jpeg cannot encode RGBA8 pixels");
    }

    #[test]
    fn codec_error_keeps_source() {
        let io = std::io::Error::other("boom");
        let err = ImageError::from_codec(ImageFormat::Png, io);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn io_from() {
        let err: ImageError = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(err, ImageError::Io(_)));
    }
}
