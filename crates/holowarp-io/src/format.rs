//! Image format detection
//!
//! Detects image formats by examining magic numbers in the header.

use crate::{IoError, IoResult};
use holowarp_core::ImageFormat;

/// Magic numbers for image format detection
mod magic {
    /// BMP: "BM"
    pub const BMP: &[u8] = b"BM";

    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    /// GIF87a
    pub const GIF87A: &[u8] = b"GIF87a";

    /// GIF89a
    pub const GIF89A: &[u8] = b"GIF89a";

    /// WebP: RIFF....WEBP
    pub const RIFF: &[u8] = b"RIFF";
    pub const WEBP: &[u8] = b"WEBP";
}

/// Detect image format from the leading bytes of an encoded image.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] if fewer than 2 bytes are given and
/// [`IoError::UnsupportedFormat`] if no known signature matches.
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    if data.starts_with(magic::BMP) {
        return Ok(ImageFormat::Bmp);
    }

    if data.starts_with(magic::PNG) {
        return Ok(ImageFormat::Png);
    }

    if data.starts_with(magic::JPEG) {
        return Ok(ImageFormat::Jpeg);
    }

    if data.starts_with(magic::GIF87A) || data.starts_with(magic::GIF89A) {
        return Ok(ImageFormat::Gif);
    }

    if data.len() >= 12 && data.starts_with(magic::RIFF) && &data[8..12] == magic::WEBP {
        return Ok(ImageFormat::WebP);
    }

    Err(IoError::UnsupportedFormat(
        "unknown image format".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_bmp() {
        let data = b"BM\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";
        assert_eq!(detect_format_from_bytes(data).unwrap(), ImageFormat::Bmp);
    }

    #[test]
    fn test_detect_png() {
        let data = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01,
        ];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_gif() {
        assert_eq!(
            detect_format_from_bytes(b"GIF89a\x01\x00").unwrap(),
            ImageFormat::Gif
        );
        assert_eq!(
            detect_format_from_bytes(b"GIF87a\x01\x00").unwrap(),
            ImageFormat::Gif
        );
    }

    #[test]
    fn test_detect_webp() {
        let data = b"RIFF\x24\x00\x00\x00WEBPVP8 ";
        assert_eq!(detect_format_from_bytes(data).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_riff_without_webp_is_unknown() {
        let data = b"RIFF\x24\x00\x00\x00WAVEfmt ";
        assert!(matches!(
            detect_format_from_bytes(data),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            detect_format_from_bytes(&[0xFF]),
            Err(IoError::InvalidData(_))
        ));
        assert!(detect_format_from_bytes(&[]).is_err());
    }

    #[test]
    fn test_truncated_png_signature_is_unknown() {
        assert!(detect_format_from_bytes(&[0x89, 0x50, 0x4E]).is_err());
    }
}
