//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! the `jpeg-encoder` crate. Grayscale and RGB inputs are supported; CMYK
//! JPEGs are rejected.

use crate::{IoError, IoResult};
use holowarp_core::{Raster, RasterMut, color};
use jpeg_decoder::{Decoder, PixelFormat};
use jpeg_encoder::{ColorType, Encoder};
use std::io::{Read, Write};

/// Quality used when no explicit JPEG quality is requested.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Largest width or height a baseline JPEG frame header can express.
pub const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// An RGBA raster; grayscale input is expanded to gray RGB.
pub fn read_jpeg<R: Read>(mut reader: R) -> IoResult<Raster> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(IoError::Io)?;

    let mut decoder = Decoder::new(bytes.as_slice());
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG has no frame header".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let samples = match info.pixel_format {
        PixelFormat::L8 => 1,
        PixelFormat::L16 => 2,
        PixelFormat::RGB24 => 3,
        PixelFormat::CMYK32 => {
            return Err(IoError::UnsupportedFormat(
                "CMYK JPEG not supported".to_string(),
            ));
        }
    };

    let expected = width as usize * height as usize * samples;
    if data.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG data too short: {} < {}",
            data.len(),
            expected
        )));
    }

    // L16 samples are native-endian and hold `precision` significant bits
    let precision = frame_precision(&bytes).unwrap_or(16);

    let mut raster = RasterMut::new(width, height)?;
    for (pixel, src) in raster.data_mut().iter_mut().zip(data.chunks_exact(samples)) {
        *pixel = match info.pixel_format {
            PixelFormat::L8 => color::compose_rgb(src[0], src[0], src[0]),
            PixelFormat::L16 => {
                let gray = gray16_to_gray8([src[0], src[1]], precision);
                color::compose_rgb(gray, gray, gray)
            }
            _ => color::compose_rgb(src[0], src[1], src[2]),
        };
    }

    Ok(raster.into())
}

/// Sample precision from the first start-of-frame segment.
fn frame_precision(bytes: &[u8]) -> Option<u8> {
    // Skip SOI
    let mut pos = 2;
    while pos + 4 < bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // SOF0..SOF15, minus DHT, JPG and DAC
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            return Some(bytes[pos + 4]);
        }
        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        pos += 2 + length;
    }
    None
}

/// Rescale a native-endian gray sample with `precision` significant
/// bits to 8 bits.
fn gray16_to_gray8(sample: [u8; 2], precision: u8) -> u8 {
    let max = (1u32 << precision.clamp(1, 16)) - 1;
    let sample = (u16::from_ne_bytes(sample) as u32).min(max);
    ((sample * 255 + max / 2) / max) as u8
}

/// Write a JPEG image.
///
/// Alpha is discarded. `quality` is clamped into `1..=100`.
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] if either dimension exceeds
/// [`MAX_JPEG_DIMENSION`] or the encoder fails.
pub fn write_jpeg<W: Write>(raster: &Raster, writer: W, quality: u8) -> IoResult<()> {
    let (width, height) = raster.dimensions();
    if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
        return Err(IoError::EncodeError(format!(
            "image {}x{} exceeds JPEG limit of {} pixels per side",
            width, height, MAX_JPEG_DIMENSION
        )));
    }

    let encoder = Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(
            &raster.to_rgb_bytes(),
            width as u16,
            height as u16,
            ColorType::Rgb,
        )
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn channel_close(a: u8, b: u8, tol: u8) -> bool {
        a.abs_diff(b) <= tol
    }

    #[test]
    fn test_jpeg_roundtrip_solid() {
        let raster = Raster::new_filled(16, 16, color::compose_rgb(200, 40, 90)).unwrap();
        let mut data = Vec::new();
        write_jpeg(&raster, &mut data, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);

        let back = read_jpeg(Cursor::new(data)).unwrap();
        assert_eq!(back.dimensions(), (16, 16));
        let (r, g, b, a) = back.get_rgba(7, 7).unwrap();
        assert!(channel_close(r, 200, 4), "r = {}", r);
        assert!(channel_close(g, 40, 4), "g = {}", g);
        assert!(channel_close(b, 90, 4), "b = {}", b);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_write_is_deterministic() {
        let raster = Raster::new_filled(9, 5, color::compose_rgb(1, 128, 255)).unwrap();
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_jpeg(&raster, &mut a, 75).unwrap();
        write_jpeg(&raster, &mut b, 75).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_quality_is_clamped() {
        let raster = Raster::new_filled(4, 4, color::compose_rgb(9, 9, 9)).unwrap();
        let mut zero = Vec::new();
        let mut one = Vec::new();
        write_jpeg(&raster, &mut zero, 0).unwrap();
        write_jpeg(&raster, &mut one, 1).unwrap();
        assert_eq!(zero, one);
    }

    #[test]
    fn test_write_rejects_oversized() {
        let raster = Raster::new(MAX_JPEG_DIMENSION + 1, 1).unwrap();
        let mut data = Vec::new();
        assert!(matches!(
            write_jpeg(&raster, &mut data, 90),
            Err(IoError::EncodeError(_))
        ));
        assert!(data.is_empty());
    }

    #[test]
    fn test_read_truncated() {
        let raster = Raster::new_filled(32, 32, color::compose_rgb(10, 200, 10)).unwrap();
        let mut data = Vec::new();
        write_jpeg(&raster, &mut data, 90).unwrap();
        data.truncate(20);
        assert!(read_jpeg(Cursor::new(data)).is_err());
    }

    #[test]
    fn test_gray16_to_gray8() {
        assert_eq!(gray16_to_gray8(0x1234u16.to_ne_bytes(), 16), 0x12);
        assert_eq!(gray16_to_gray8(0xFFFFu16.to_ne_bytes(), 16), 255);
        assert_eq!(gray16_to_gray8(0u16.to_ne_bytes(), 16), 0);
        // 12-bit lossless
        assert_eq!(gray16_to_gray8(0x0FFFu16.to_ne_bytes(), 12), 255);
        assert_eq!(gray16_to_gray8(0x0800u16.to_ne_bytes(), 12), 128);
        assert_eq!(gray16_to_gray8(0x3000u16.to_ne_bytes(), 12), 255);
    }

    #[test]
    fn test_frame_precision() {
        let raster = Raster::new_filled(8, 8, color::compose_rgb(1, 2, 3)).unwrap();
        let mut data = Vec::new();
        write_jpeg(&raster, &mut data, 90).unwrap();
        assert_eq!(frame_precision(&data), Some(8));

        // SOI, APP0 with empty payload, SOF3 at 12 bits
        let lossless = [
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x02, 0xFF, 0xC3, 0x00, 0x0B, 0x0C, 0x00, 0x01,
        ];
        assert_eq!(frame_precision(&lossless), Some(12));
        assert_eq!(frame_precision(&[0xFF, 0xD8]), None);
    }
}
