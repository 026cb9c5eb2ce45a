//! Container format tags.
//!
//! Formats are always named explicitly by the caller. There is no content
//! sniffing.

/// Image container formats known to the request builders.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Headerless pixel bytes in the [`Image`](crate::Image) buffer layout.
    Raw,
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Detect format from file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "raw" | "bin" => Some(ImageFormat::Raw),
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// MIME type string.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Raw => "application/octet-stream",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Common file extensions.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Raw => &["raw", "bin"],
            ImageFormat::Png => &["png"],
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::Gif => &["gif"],
        }
    }

    /// Whether this format supports an alpha channel.
    pub fn supports_alpha(self) -> bool {
        match self {
            ImageFormat::Raw => true,
            ImageFormat::Png => true,
            ImageFormat::Jpeg => false,
            ImageFormat::Gif => true,
        }
    }

    /// Whether this format can store 16-bit channels.
    pub fn supports_16bit(self) -> bool {
        matches!(self, ImageFormat::Raw | ImageFormat::Png)
    }
}
