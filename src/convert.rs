//! Pairwise pixel-format conversion.
//!
//! A closed table of twelve transforms covering every ordered pair in
//! `{RGB, RGBA} × {8-bit, 16-bit}`. Each transform walks `pixels` pixels
//! with fixed input and output strides and never allocates.
//!
//! Channel rules:
//!
//! - 8 → 16 bit: `v << 8` (high byte = source value, low byte zero).
//! - 16 → 8 bit: `v >> 8` (truncating).
//! - Adding alpha copies color channels and fills alpha with full opacity.
//! - Dropping alpha discards it without blending.
//!
//! 16-bit channels are native-endian `u16`, matching the [`Image`](crate::Image)
//! buffer layout.

use crate::color::{ChannelDepth, ColorSpec, PixelFormat};
use crate::error::ImageError;

/// Per-pixel transform: `(src, dst, pixel_count)`.
pub(crate) type ConvertFn = fn(&[u8], &mut [u8], usize);

const OPAQUE8: u8 = u8::MAX;
const OPAQUE16: [u8; 2] = u16::MAX.to_ne_bytes();

#[inline(always)]
fn widen(v: u8) -> [u8; 2] {
    (u16::from(v) << 8).to_ne_bytes()
}

#[inline(always)]
fn narrow(s: &[u8]) -> u8 {
    (u16::from_ne_bytes([s[0], s[1]]) >> 8) as u8
}

// ===========================================================================
// RGB sources
// ===========================================================================

fn rgb8_to_rgb16(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(6)).take(pixels) {
        d[0..2].copy_from_slice(&widen(s[0]));
        d[2..4].copy_from_slice(&widen(s[1]));
        d[4..6].copy_from_slice(&widen(s[2]));
    }
}

fn rgb8_to_rgba8(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)).take(pixels) {
        d[..3].copy_from_slice(s);
        d[3] = OPAQUE8;
    }
}

fn rgb8_to_rgba16(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(8)).take(pixels) {
        d[0..2].copy_from_slice(&widen(s[0]));
        d[2..4].copy_from_slice(&widen(s[1]));
        d[4..6].copy_from_slice(&widen(s[2]));
        d[6..8].copy_from_slice(&OPAQUE16);
    }
}

fn rgb16_to_rgb8(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(6).zip(dst.chunks_exact_mut(3)).take(pixels) {
        d[0] = narrow(&s[0..2]);
        d[1] = narrow(&s[2..4]);
        d[2] = narrow(&s[4..6]);
    }
}

fn rgb16_to_rgba8(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(6).zip(dst.chunks_exact_mut(4)).take(pixels) {
        d[0] = narrow(&s[0..2]);
        d[1] = narrow(&s[2..4]);
        d[2] = narrow(&s[4..6]);
        d[3] = OPAQUE8;
    }
}

fn rgb16_to_rgba16(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(6).zip(dst.chunks_exact_mut(8)).take(pixels) {
        d[..6].copy_from_slice(s);
        d[6..8].copy_from_slice(&OPAQUE16);
    }
}

// ===========================================================================
// RGBA sources
// ===========================================================================

fn rgba8_to_rgba16(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(8)).take(pixels) {
        d[0..2].copy_from_slice(&widen(s[0]));
        d[2..4].copy_from_slice(&widen(s[1]));
        d[4..6].copy_from_slice(&widen(s[2]));
        d[6..8].copy_from_slice(&widen(s[3]));
    }
}

fn rgba8_to_rgb8(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)).take(pixels) {
        d.copy_from_slice(&s[..3]);
    }
}

fn rgba8_to_rgb16(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(6)).take(pixels) {
        d[0..2].copy_from_slice(&widen(s[0]));
        d[2..4].copy_from_slice(&widen(s[1]));
        d[4..6].copy_from_slice(&widen(s[2]));
    }
}

fn rgba16_to_rgba8(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(8).zip(dst.chunks_exact_mut(4)).take(pixels) {
        d[0] = narrow(&s[0..2]);
        d[1] = narrow(&s[2..4]);
        d[2] = narrow(&s[4..6]);
        d[3] = narrow(&s[6..8]);
    }
}

fn rgba16_to_rgb8(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(8).zip(dst.chunks_exact_mut(3)).take(pixels) {
        d[0] = narrow(&s[0..2]);
        d[1] = narrow(&s[2..4]);
        d[2] = narrow(&s[4..6]);
    }
}

fn rgba16_to_rgb16(src: &[u8], dst: &mut [u8], pixels: usize) {
    for (s, d) in src.chunks_exact(8).zip(dst.chunks_exact_mut(6)).take(pixels) {
        d.copy_from_slice(&s[..6]);
    }
}

// ===========================================================================
// Dispatch
// ===========================================================================

/// Look up the transform for an ordered pair. Identity pairs and anything
/// involving [`PixelFormat::Monochromatic`] have no entry.
pub(crate) fn lookup(from: ColorSpec, to: ColorSpec) -> Option<ConvertFn> {
    use ChannelDepth::{Bits8, Bits16};
    use PixelFormat::{Rgb, Rgba};

    let f: ConvertFn = match (
        (from.format(), from.channel_depth()),
        (to.format(), to.channel_depth()),
    ) {
        ((Rgb, Bits8), (Rgb, Bits16)) => rgb8_to_rgb16,
        ((Rgb, Bits8), (Rgba, Bits8)) => rgb8_to_rgba8,
        ((Rgb, Bits8), (Rgba, Bits16)) => rgb8_to_rgba16,
        ((Rgb, Bits16), (Rgb, Bits8)) => rgb16_to_rgb8,
        ((Rgb, Bits16), (Rgba, Bits8)) => rgb16_to_rgba8,
        ((Rgb, Bits16), (Rgba, Bits16)) => rgb16_to_rgba16,
        ((Rgba, Bits8), (Rgba, Bits16)) => rgba8_to_rgba16,
        ((Rgba, Bits8), (Rgb, Bits8)) => rgba8_to_rgb8,
        ((Rgba, Bits8), (Rgb, Bits16)) => rgba8_to_rgb16,
        ((Rgba, Bits16), (Rgba, Bits8)) => rgba16_to_rgba8,
        ((Rgba, Bits16), (Rgb, Bits8)) => rgba16_to_rgb8,
        ((Rgba, Bits16), (Rgb, Bits16)) => rgba16_to_rgb16,
        _ => return None,
    };
    Some(f)
}

/// Whether `from` can be converted to `to`. Identity is always supported.
pub fn is_supported(from: ColorSpec, to: ColorSpec) -> bool {
    from == to || lookup(from, to).is_some()
}

/// Every non-identity pair with a defined transform.
pub fn supported_pairs() -> impl Iterator<Item = (ColorSpec, ColorSpec)> {
    const ALL: [ColorSpec; 6] = [
        ColorSpec::GRAY8,
        ColorSpec::GRAY16,
        ColorSpec::RGB8,
        ColorSpec::RGB16,
        ColorSpec::RGBA8,
        ColorSpec::RGBA16,
    ];
    ALL.into_iter()
        .flat_map(|from| ALL.into_iter().map(move |to| (from, to)))
        .filter(|&(from, to)| lookup(from, to).is_some())
}

/// Convert a tightly packed pixel run from `from` to `to`.
///
/// `src` must hold a whole number of `from` pixels and `dst` must have room
/// for the same number of `to` pixels. Returns the pixel count.
///
/// # Errors
///
/// [`ImageError::UnsupportedConversion`] when no transform exists for the
/// pair, [`ImageError::InvalidInput`] on mismatched slice lengths.
pub fn convert_pixels(
    from: ColorSpec,
    to: ColorSpec,
    src: &[u8],
    dst: &mut [u8],
) -> Result<usize, ImageError> {
    let src_bpp = from.bytes_per_pixel();
    if src.len() % src_bpp != 0 {
        return Err(ImageError::InvalidInput(alloc::format!(
            "source length {} is not a multiple of the {} pixel size {}",
            src.len(),
            from,
            src_bpp
        )));
    }
    let pixels = src.len() / src_bpp;
    let needed = pixels * to.bytes_per_pixel();
    if dst.len() < needed {
        return Err(ImageError::InvalidInput(alloc::format!(
            "destination holds {} bytes, {} pixels of {} need {}",
            dst.len(),
            pixels,
            to,
            needed
        )));
    }

    if from == to {
        dst[..needed].copy_from_slice(src);
        return Ok(pixels);
    }

    let f = lookup(from, to).ok_or(ImageError::UnsupportedConversion { from, to })?;
    f(src, &mut dst[..needed], pixels);
    Ok(pixels)
}
